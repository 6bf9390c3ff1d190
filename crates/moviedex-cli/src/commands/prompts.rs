use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::{Confirm, Input};
use std::io::BufRead;

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new().with_prompt(prompt).allow_empty(true);

    if let Some(default_value) = default {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder
        .interact_text()
        .map_err(|e| eyre!("Failed to read input: {}", e))
}

/// Masked password prompt on the controlling terminal
pub fn prompt_password(prompt: &str) -> Result<String> {
    rpassword::prompt_password(format!("{}: ", prompt)).map_err(|e| eyre!("Failed to read password: {}", e))
}

/// First line of stdin, for piping secrets in scripts
pub fn read_secret_from_stdin() -> Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| eyre!("Failed to read from stdin: {}", e))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| eyre!("Failed to read confirmation: {}", e))
}
