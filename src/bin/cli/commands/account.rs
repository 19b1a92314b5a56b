use std::io::{self, Write};

use anyhow::{anyhow, Context, Result};

use hifdh_lib::auth::{validate_signup, AuthError, IdentityClient, Session};
use hifdh_lib::sync::SyncOutcome;

use crate::app::{sync_adapter, App};
use crate::OutputFormat;

/// Read one line from stdin after printing `label` to stderr
fn prompt(label: &str) -> Result<String> {
    eprint!("{}: ", label);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn auth_failure(e: AuthError) -> anyhow::Error {
    log::warn!("Auth: {}", e);
    anyhow!(e.user_message())
}

/// Store the session in the config file
fn remember(app: &App, session: &Session) -> Result<()> {
    let mut config = app.config.clone();
    config.session = Some(session.clone());
    config
        .save(&app.config_path)
        .with_context(|| format!("Failed to write {}", app.config_path.display()))
}

fn print_session(session: &Session, format: &OutputFormat, verb: &str) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "uid": session.uid, "email": session.email });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "{} as {}",
                verb,
                session.email.as_deref().unwrap_or(&session.uid)
            );
        }
    }
    Ok(())
}

pub async fn run_signup(app: &App, name: &str, email: &str, format: &OutputFormat) -> Result<()> {
    let password = prompt("Password")?;
    let confirm = prompt("Confirm password")?;
    validate_signup(name, email, &password, &confirm).map_err(auth_failure)?;

    let client = IdentityClient::new(&app.config.auth).map_err(auth_failure)?;
    let session = client
        .sign_up(email.trim(), &password)
        .await
        .map_err(auth_failure)?;
    remember(app, &session)?;

    let sync = sync_adapter(&app.config, Some(session.clone()))?;
    match sync.seed_account(email.trim(), name.trim()).await {
        SyncOutcome::Failed(e) => log::warn!("Account document not created: {}", e),
        outcome => log::debug!("Account seed: {:?}", outcome),
    }

    print_session(&session, format, "Signed up")
}

pub async fn run_login(app: &App, email: &str, format: &OutputFormat) -> Result<()> {
    let password = prompt("Password")?;
    if email.trim().is_empty() || password.is_empty() {
        return Err(auth_failure(AuthError::MissingFields));
    }

    let client = IdentityClient::new(&app.config.auth).map_err(auth_failure)?;
    let session = client
        .sign_in(email.trim(), &password)
        .await
        .map_err(auth_failure)?;
    remember(app, &session)?;

    print_session(&session, format, "Signed in")
}

pub fn run_logout(app: &App) -> Result<()> {
    if app.config.session.is_none() {
        println!("Not signed in");
        return Ok(());
    }
    let mut config = app.config.clone();
    config.session = None;
    config
        .save(&app.config_path)
        .with_context(|| format!("Failed to write {}", app.config_path.display()))?;
    println!("Signed out");
    Ok(())
}
