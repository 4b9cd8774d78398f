/// Minimum password length accepted by the registration endpoint
const MIN_PASSWORD_LENGTH: usize = 8;

/// Special characters the registration endpoint accepts as the "symbol"
/// class. Must stay in sync with the server's rule.
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Requirements text shown when a password fails the check, matching what
/// the server reports for the same violation.
pub const PASSWORD_REQUIREMENTS: &str = "Password must be at least 8 characters long and contain \
     at least one uppercase letter, one lowercase letter, one number, and one special character.";

/// Check a password against the registration rules before sending it.
///
/// The server enforces the same rules; checking here just saves a round
/// trip for a password that cannot possibly be accepted.
pub fn password_meets_requirements(password: &str) -> bool {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return false;
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| SPECIAL_CHARS.contains(c));

    has_upper && has_lower && has_digit && has_special
}
