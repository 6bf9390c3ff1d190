use super::prompts;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::{Result, Section};
use moviedex_config::Config;
use moviedex_core::{Credentials, ExternalProfile, LocalIdentityProvider, Session};
use serde_json::json;

#[derive(Debug, Default, clap::Args)]
pub struct LoginArgs {
    /// Username (prompted if omitted)
    pub username: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,

    /// Sign in with a profile from an external provider instead of a password
    #[arg(long, conflicts_with_all = ["username", "password_stdin"])]
    pub external: bool,

    /// External provider name
    #[arg(long, default_value = "google")]
    pub provider: String,

    /// Display name of the external profile
    #[arg(long, requires = "external")]
    pub name: Option<String>,

    /// Email of the external profile
    #[arg(long, requires = "external")]
    pub email: Option<String>,

    /// Avatar URL of the external profile
    #[arg(long, requires = "external")]
    pub avatar: Option<String>,
}

pub async fn run_login(args: LoginArgs, config: &Config, session: &mut Session, output: &Output) -> Result<()> {
    let credentials = if args.external {
        let display_name = match args.name {
            Some(name) => name,
            None => prompts::prompt_string("Display name", None)?,
        };
        Credentials::External(ExternalProfile {
            provider: args.provider,
            display_name,
            email: args.email,
            avatar_url: args.avatar,
        })
    } else {
        let username = match args.username {
            Some(username) => username,
            None => prompts::prompt_string("Username", None)?,
        };
        let password = if args.password_stdin {
            prompts::read_secret_from_stdin()?
        } else {
            prompts::prompt_password("Password")?
        };
        Credentials::Password { username, password }
    };

    let previous = session.user().map(|u| u.id.clone());
    let provider = LocalIdentityProvider::new(config.auth.min_password_length);
    let user = session
        .login(&provider, &credentials)
        .await
        .map_err(|e| eyre!("Login failed: {}", e))
        .suggestion("Any username works; the password only needs to be long enough")?;

    if let Some(previous) = previous.filter(|p| *p != user.id) {
        tracing::info!("Replaced signed-in identity {}", previous);
    }

    if output.is_human() {
        output.success(format!("Signed in as {}", output.accent(&user.display_name)));
        output.println(output.muted(&format!("{} favorite(s) on this account", session.favorites().len())));
    } else {
        output.json(&json!({ "user": user, "favorites": session.favorites().len() }));
    }
    Ok(())
}

pub fn run_logout(session: &mut Session, output: &Output) -> Result<()> {
    match session.logout() {
        Some(user) if output.is_human() => {
            output.success(format!("Signed out {}", user.display_name));
            output.println(output.muted("Your favorites are kept for the next sign-in"));
        }
        Some(user) => output.json(&json!({ "signed_out": user.id })),
        None => output.info("Not signed in"),
    }
    Ok(())
}

pub fn run_whoami(session: &Session, output: &Output) -> Result<()> {
    let user = session.user();
    if !output.is_human() {
        output.json(&json!({
            "user": user,
            "authenticated": user.is_some(),
            "favorites": session.favorites().len(),
            "theme": session.theme().mode().as_str(),
        }));
        return Ok(());
    }

    match user {
        Some(user) => {
            output.println(format!("Signed in as {}", output.accent(&user.display_name)));
            output.println(output.muted(&format!("  id: {}", user.id)));
            if let Some(email) = &user.email {
                output.println(output.muted(&format!("  email: {}", email)));
            }
        }
        None => output.println("Not signed in (favorites are kept in the anonymous list)"),
    }
    output.println(format!("{} favorite(s), {} theme", session.favorites().len(), session.theme().mode()));
    Ok(())
}
