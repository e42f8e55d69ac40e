mod account;
mod browse;
mod favourites;

pub use account::{cmd_login, cmd_logout, cmd_reset_password, cmd_signup, cmd_whoami};
pub use browse::{cmd_details, cmd_search, cmd_trending};
pub use favourites::{cmd_favourites_add, cmd_favourites_list, cmd_favourites_remove};

use crate::models::MediaSummary;
use crate::screens::ErrorNotice;

fn print_summaries(items: &[MediaSummary]) {
    for item in items {
        let year = item.year().unwrap_or("----");
        println!(
            "• {} ({year}) [{}] ★ {:.1}",
            item.title, item.media_type, item.vote_average
        );
        println!("  ID: {} | Language: {}", item.id, item.original_language);
    }
}

fn print_notice(notice: &ErrorNotice) {
    match notice.status_code {
        Some(code) => println!("Error ({code}): {}", notice.message),
        None => println!("Error: {}", notice.message),
    }
    if notice.retryable {
        println!("This may be temporary, try again.");
    }
}

/// Password from the command line or, when absent, read from stdin.
fn password_or_prompt(password: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    println!("Password:");
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

fn print_field_errors(errors: &[&Option<String>]) -> bool {
    let mut any = false;
    for message in errors.iter().filter_map(|e| e.as_deref()) {
        println!("  ✗ {message}");
        any = true;
    }
    any
}
