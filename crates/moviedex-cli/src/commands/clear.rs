use super::progress::is_interactive;
use super::prompts;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use moviedex_config::PathManager;
use moviedex_core::Session;
use std::fs;

pub fn run_clear(
    all: bool,
    preferences: bool,
    credentials: bool,
    yes: bool,
    paths: &PathManager,
    session: &Session,
    output: &Output,
) -> Result<()> {
    let preferences = preferences || all;
    let credentials = credentials || all;

    if !preferences && !credentials {
        output.warn("No clear option specified. Use --preferences, --credentials, or --all");
        output.println("\nExample: moviedex clear --preferences");
        return Ok(());
    }

    if !yes && is_interactive() {
        let what = match (preferences, credentials) {
            (true, true) => "all preferences (favorites, history, theme, sign-in) and stored credentials",
            (true, false) => "all preferences (favorites, history, theme, sign-in)",
            _ => "stored credentials",
        };
        if !prompts::prompt_yes_no(&format!("Delete {}?", what), false)? {
            output.info("Nothing cleared");
            return Ok(());
        }
    }

    if preferences {
        clear_preferences(session, output)?;
    }
    if credentials {
        clear_credentials(paths, output)?;
    }
    Ok(())
}

fn clear_preferences(session: &Session, output: &Output) -> Result<()> {
    let store = session.store();
    if !store.root().exists() {
        output.info("No preferences found to clear");
        return Ok(());
    }

    store
        .clear_all()
        .map_err(|e| eyre!("Failed to clear preferences: {}", e))?;
    output.success(format!("Cleared preferences: {}", store.root().display()));
    Ok(())
}

fn clear_credentials(paths: &PathManager, output: &Output) -> Result<()> {
    let credentials_file = paths.credentials_file();

    if credentials_file.exists() {
        fs::remove_file(&credentials_file).map_err(|e| {
            eyre!("Failed to remove credentials file at {}: {}", credentials_file.display(), e)
        })?;
        output.success(format!("Cleared credentials: {}", credentials_file.display()));
    } else {
        output.info("No credentials file found to clear");
    }
    Ok(())
}
