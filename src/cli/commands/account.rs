//! Account command handlers

use super::{password_or_prompt, print_field_errors, print_notice};
use crate::constants::preferences::{FIRST_NAME, LAST_NAME};
use crate::screens::auth::{LogInEvent, ResetPasswordEvent, SignUpEvent};
use crate::state::AppState;

pub async fn cmd_signup(
    state: &AppState,
    first_name: String,
    last_name: String,
    email: String,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = password_or_prompt(password)?;
    let holder = state.sign_up_holder();

    for event in [
        SignUpEvent::FirstNameChanged(first_name),
        SignUpEvent::LastNameChanged(last_name),
        SignUpEvent::EmailChanged(email),
        SignUpEvent::PasswordChanged(password),
        SignUpEvent::Submit,
    ] {
        holder.on_event(event).await;
    }

    let snapshot = holder.state();
    holder.detach();

    if print_field_errors(&[
        &snapshot.first_name_error,
        &snapshot.last_name_error,
        &snapshot.email_error,
        &snapshot.password_error,
    ]) {
        return Ok(());
    }

    match (&snapshot.account, &snapshot.error) {
        (Some(account), _) => println!("Welcome, {}! Signed in as {}", snapshot.first_name.trim(), account.email),
        (None, Some(notice)) => print_notice(notice),
        (None, None) => {}
    }

    Ok(())
}

pub async fn cmd_login(state: &AppState, email: String, password: Option<String>) -> anyhow::Result<()> {
    let password = password_or_prompt(password)?;
    let holder = state.log_in_holder();

    holder.on_event(LogInEvent::EmailChanged(email)).await;
    holder.on_event(LogInEvent::PasswordChanged(password)).await;
    holder.on_event(LogInEvent::Submit).await;

    let snapshot = holder.state();
    holder.detach();

    if print_field_errors(&[&snapshot.email_error, &snapshot.password_error]) {
        return Ok(());
    }

    match (&snapshot.account, &snapshot.error) {
        (Some(account), _) => println!("Signed in as {}", account.email),
        (None, Some(notice)) => print_notice(notice),
        (None, None) => {}
    }

    Ok(())
}

pub async fn cmd_logout(state: &AppState) -> anyhow::Result<()> {
    state.auth.sign_out().await?;
    println!("Signed out.");
    Ok(())
}

pub async fn cmd_reset_password(state: &AppState, email: String) -> anyhow::Result<()> {
    let holder = state.reset_password_holder();

    holder.on_event(ResetPasswordEvent::EmailChanged(email)).await;
    holder.on_event(ResetPasswordEvent::Submit).await;

    let snapshot = holder.state();
    holder.detach();

    if print_field_errors(&[&snapshot.email_error]) {
        return Ok(());
    }

    if snapshot.sent {
        println!("Password reset requested for {}", snapshot.email);
    } else if let Some(notice) = &snapshot.error {
        print_notice(notice);
    }

    Ok(())
}

pub async fn cmd_whoami(state: &AppState) -> anyhow::Result<()> {
    let Some(account) = state.auth.current_user().await? else {
        println!("Not signed in.");
        println!();
        println!("Sign in with: reelvault login <email>");
        return Ok(());
    };

    let first = state.store.get_preference(FIRST_NAME).await?.unwrap_or_default();
    let last = state.store.get_preference(LAST_NAME).await?.unwrap_or_default();
    let name = format!("{first} {last}");

    println!("Email: {}", account.email);
    if !name.trim().is_empty() {
        println!("Name:  {}", name.trim());
    }
    println!("ID:    {}", account.user_id);

    Ok(())
}
