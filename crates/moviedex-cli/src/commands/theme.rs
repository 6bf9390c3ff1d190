use crate::output::Output;
use color_eyre::Result;
use moviedex_core::{Session, ThemeSource};
use moviedex_models::ThemeMode;
use serde_json::json;

#[derive(clap::Subcommand)]
pub enum ThemeCommands {
    /// Show the active theme and its palette
    Show,
    /// Switch between light and dark
    Toggle,
    /// Choose a mode explicitly
    Set { mode: ThemeMode },
}

pub fn run_theme(cmd: ThemeCommands, session: &mut Session, output: &mut Output) -> Result<()> {
    match cmd {
        ThemeCommands::Show => {}
        ThemeCommands::Toggle => {
            let mode = session.theme_mut().toggle();
            output.set_theme(mode);
            output.success(format!("Theme switched to {}", mode));
        }
        ThemeCommands::Set { mode } => {
            session.theme_mut().set(mode);
            output.set_theme(mode);
            output.success(format!("Theme set to {}", mode));
        }
    }
    show_theme(session, output);
    Ok(())
}

fn show_theme(session: &Session, output: &Output) {
    let theme = session.theme();
    let source = match theme.source() {
        ThemeSource::Persisted => "saved preference",
        ThemeSource::System => "terminal background",
        ThemeSource::Default => "default",
    };
    let palette = theme.palette();

    if !output.is_human() {
        output.json(&json!({
            "mode": theme.mode().as_str(),
            "source": source,
            "palette": {
                "primary": palette.primary,
                "secondary": palette.secondary,
                "background": palette.background,
                "paper": palette.paper,
                "text": palette.text,
                "muted": palette.muted,
            }
        }));
        return;
    }

    output.println(format!("{} {}", output.heading("Theme:"), theme.mode()));
    output.println(output.muted(&format!("  from {}", source)));
    output.println(format!("  {} {}", output.accent("■"), palette.primary));
    output.println(format!("  {} {}", output.highlight("■"), palette.secondary));
    output.println(format!("  {} {}", output.muted("■"), palette.muted));
}
