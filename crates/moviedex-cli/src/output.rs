use clap::ValueEnum;
use moviedex_models::{hex_to_rgb, Palette, ThemeMode};
use owo_colors::OwoColorize;
use serde_json::json;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

/// Where every user-facing line goes. Human output is tinted with the active theme's palette.
pub struct Output {
    format: OutputFormat,
    quiet: bool,
    palette: &'static Palette,
    colored: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool, theme: ThemeMode) -> Self {
        Self {
            format,
            quiet,
            palette: theme.palette(),
            colored: std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.palette = theme.palette();
    }

    fn tint(&self, text: &str, hex: &str) -> String {
        match hex_to_rgb(hex) {
            Some((r, g, b)) if self.colored => text.truecolor(r, g, b).to_string(),
            _ => text.to_string(),
        }
    }

    pub fn accent(&self, text: &str) -> String {
        self.tint(text, self.palette.primary)
    }

    pub fn highlight(&self, text: &str) -> String {
        self.tint(text, self.palette.secondary)
    }

    pub fn muted(&self, text: &str) -> String {
        self.tint(text, self.palette.muted)
    }

    pub fn heading(&self, text: &str) -> String {
        if self.colored {
            self.accent(text).bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => println!("{} {}", "✓".green(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "success", "message": msg.as_ref() }));
            }
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors are shown even in quiet mode
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "error", "message": msg.as_ref() }));
            }
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "info", "message": msg.as_ref() }));
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => println!("{} {}", "⚠".yellow(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "warning", "message": msg.as_ref() }));
            }
        }
    }

    /// Plain line in human mode; dropped in JSON modes where `json` carries the data
    pub fn println(&self, msg: impl AsRef<str>) {
        if self.quiet || !self.is_human() {
            return;
        }
        println!("{}", msg.as_ref());
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format != OutputFormat::Human {
            return;
        }

        self.print_json(data);
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(data).unwrap_or_default()),
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default())
            }
            OutputFormat::Human => println!("{}", data),
        }
    }
}
