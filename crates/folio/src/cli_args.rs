//! All the CLI arguments for Folio

/// The name of the main config file, unless overridden with `--main-config`.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "folio.toml";

/// A résumé page for your terminal, over a field of drifting particles.
#[derive(clap::Parser, Debug, Clone)]
#[command(
    version,
    about,
    long_about = "Show a résumé in your terminal over an animated field of connected particles. \
                  Press `t` to toggle the theme, digits to jump to a section and `q` to quit."
)]
#[non_exhaustive]
pub struct CliArgs {
    /// What to do. Shows the page when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the config directory.
    #[arg(long)]
    pub config_dir: Option<std::path::PathBuf>,

    /// Name of the main config file, relative to the config directory.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE_NAME)]
    pub main_config: std::path::PathBuf,

    /// The log level, overrides the one in the config file.
    #[arg(long, value_enum)]
    pub log_level: Option<crate::config::main::LogLevel>,

    /// Where to write logs, overrides the one in the config file.
    #[arg(long)]
    pub log_path: Option<std::path::PathBuf>,

    /// Exit after drawing this many frames.
    #[arg(long)]
    pub frames: Option<u64>,

    /// Seed the particle field, to get the same animation every time.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Things that can be done without showing the page.
#[derive(clap::Subcommand, Debug, Clone)]
#[non_exhaustive]
pub enum Command {
    /// Write a message to the page's owner. Opens your email client.
    Contact {
        /// Your name
        #[arg(long)]
        name: String,
        /// Your email address
        #[arg(long)]
        email: String,
        /// The message
        #[arg(long)]
        message: String,
    },
    /// Manage the persisted light/dark theme.
    Theme {
        /// What to do with the theme
        #[command(subcommand)]
        action: ThemeAction,
    },
}

/// Actions for the theme subcommand.
#[derive(clap::Subcommand, Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ThemeAction {
    /// Switch between light and dark.
    Toggle,
    /// Print the current theme.
    Show,
}
