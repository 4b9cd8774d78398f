//! satchel - a command-line session manager for a token-authenticated
//! account API.
//!
//! Keeps the bearer token issued at login on disk, decodes the identity it
//! carries, attaches it to outbound API requests, and tears the session
//! down on logout.

mod api;
mod auth;
mod config;
mod utils;

use std::io::{self, Write};

use anyhow::Result;
use reqwest::header::HeaderMap;
use reqwest::Method;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use api::{AuthClient, CredentialOutcome, Registration};
use auth::{Session, TokenStore};
use config::Config;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_usage() {
    eprintln!("Usage: satchel <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  login [username-or-email]   Log in and store the session token");
    eprintln!("  register                    Create a new account");
    eprintln!("  whoami                      Show the current session");
    eprintln!("  logout                      End the session");
    eprintln!("  fetch <path>                Authenticated GET against the API");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1) else {
        print_usage();
        return Ok(());
    };

    let mut config = Config::load()?;
    let store = TokenStore::new(config.session_dir()?);
    let session = Session::new(store.clone());
    let client = AuthClient::new(config.server_url.clone(), store.clone())?;

    match command.as_str() {
        "login" => cmd_login(args.get(2).cloned(), &mut config, &session, &client).await,
        "register" => cmd_register(&client).await,
        "whoami" => cmd_whoami(&session, &store),
        "logout" => cmd_logout(&session),
        "fetch" => cmd_fetch(args.get(2).map(String::as_str), &client).await,
        _ => {
            print_usage();
            anyhow::bail!("Unknown command: {command}");
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn cmd_login(
    username_arg: Option<String>,
    config: &mut Config,
    session: &Session,
    client: &AuthClient,
) -> Result<()> {
    let username = match username_arg {
        Some(username) => username,
        None => {
            let default = config.last_username.clone().unwrap_or_default();
            let label = if default.is_empty() {
                "Username or email: ".to_string()
            } else {
                format!("Username or email [{default}]: ")
            };
            let entered = prompt(&label)?;
            if entered.is_empty() { default } else { entered }
        }
    };
    if username.is_empty() {
        anyhow::bail!("A username or email is required");
    }

    let password = rpassword::prompt_password("Password: ")?;

    match client.login(&username, &password).await {
        CredentialOutcome::Accepted => {
            info!(user = %username, "Logged in");
            config.last_username = Some(username);
            if let Err(e) = config.save() {
                tracing::warn!(error = %e, "Failed to save config");
            }
            match session.current_identity() {
                Some(identity) => println!("Logged in as {} ({})", identity.username, identity.full_name),
                None => println!("Logged in."),
            }
            Ok(())
        }
        CredentialOutcome::Rejected { message } => anyhow::bail!("{message}"),
    }
}

async fn cmd_register(client: &AuthClient) -> Result<()> {
    let username = prompt("Username: ")?;
    let user_full_name = prompt("Full name: ")?;
    let user_email = prompt("Email: ")?;

    let user_password = rpassword::prompt_password("Password: ")?;
    if !utils::validate::password_meets_requirements(&user_password) {
        anyhow::bail!("{}", utils::validate::PASSWORD_REQUIREMENTS);
    }
    let confirmed = rpassword::prompt_password("Confirm password: ")?;
    if user_password != confirmed {
        anyhow::bail!("Passwords do not match");
    }

    let registration = Registration {
        username,
        user_full_name,
        user_email,
        user_password,
    };

    match client.register(&registration).await {
        CredentialOutcome::Accepted => {
            println!("Account created. You can now log in with `satchel login`.");
            Ok(())
        }
        CredentialOutcome::Rejected { message } => anyhow::bail!("{message}"),
    }
}

fn cmd_whoami(session: &Session, store: &TokenStore) -> Result<()> {
    if !session.is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }

    match session.current_identity() {
        Some(identity) => {
            println!("Logged in as {} ({})", identity.username, identity.full_name);
            if let Some(saved_at) = store.saved_at() {
                println!("Token stored {}", saved_at.format("%Y-%m-%d %H:%M UTC"));
            }
        }
        None => {
            // A token is present but does not decode; still "logged in" as
            // far as gating is concerned.
            println!("Logged in, but the stored token is unreadable.");
        }
    }
    Ok(())
}

fn cmd_logout(session: &Session) -> Result<()> {
    session.logout();
    println!("Logged out.");
    Ok(())
}

async fn cmd_fetch(path: Option<&str>, client: &AuthClient) -> Result<()> {
    let Some(path) = path else {
        anyhow::bail!("Usage: satchel fetch <path>");
    };

    let response = client
        .auth_fetch(Method::GET, path, HeaderMap::new(), None)
        .await?;

    let status = response.status();
    let body = response.text().await?;
    println!("{status}");
    if !body.is_empty() {
        println!("{body}");
    }
    Ok(())
}
