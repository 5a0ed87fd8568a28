//! All of the user config for Folio.

use color_eyre::eyre::ContextCompat as _;
use color_eyre::eyre::Result;

use crate::shared_state::SharedState;

/// A copy of the default config file. It gets copied to the user's config folder the first time
/// they start Folio.
static DEFAULT_CONFIG: &str = include_str!("../../default_config.toml");

/// The valid log levels. Based on our `tracing` crate.
#[derive(serde::Serialize, serde::Deserialize, clap::ValueEnum, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error
    Error,
    /// Warnings
    Warn,
    /// Info
    Info,
    /// Debug
    Debug,
    /// Trace
    Trace,
    /// No logging
    Off,
}

/// Managing user config.
#[expect(
    clippy::unsafe_derive_deserialize,
    reason = "Are the unsafe methods on the `f32`s?"
)]
#[derive(serde::Deserialize, Debug, Clone)]
#[serde(default)]
#[non_exhaustive]
pub struct Config {
    /// The maximum log level
    pub log_level: LogLevel,
    /// The location of the log file.
    pub log_path: std::path::PathBuf,
    /// Target frame rate
    pub frame_rate: u32,
    /// How many page pixels wide a terminal cell is. A cell is 2 "pixels" tall, so one terminal
    /// row is `2 × pixel_scale` page pixels.
    pub pixel_scale: u32,
    /// Where messages from the contact form are sent.
    pub contact_address: String,
    /// The animated background
    pub particles: particle_field::Config,
    /// The content of the page
    pub resume: crate::page::resume::Resume,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Off,
            log_path: Self::state_directory().join("folio.log"),
            frame_rate: 60,
            pixel_scale: 8,
            contact_address: crate::page::contact::DEFAULT_ADDRESS.to_owned(),
            particles: particle_field::Config::default(),
            resume: crate::page::resume::Resume::default(),
        }
    }
}

impl Config {
    /// Where Folio keeps its logs and the user's preferences.
    #[must_use]
    pub fn state_directory() -> std::path::PathBuf {
        let directory = match dirs::state_dir() {
            Some(directory) => directory,
            None => std::path::PathBuf::new().join("./"),
        };
        directory.join("folio")
    }

    /// The height of a terminal row in page pixels.
    #[must_use]
    pub fn row_height(&self) -> f32 {
        f32::from(u16::try_from(self.pixel_scale).unwrap_or(u16::MAX)) * 2.0
    }

    /// Canonical path to the config directory.
    pub async fn directory(state: &std::sync::Arc<SharedState>) -> std::path::PathBuf {
        state.config_path.read().await.clone()
    }

    /// Get the stable location of Folio's config directory on the user's system.
    pub fn default_directory() -> Result<std::path::PathBuf> {
        Ok(dirs::config_dir()
            .context("Couldn't get standard config directory")?
            .join("folio"))
    }

    /// Figure out where our config is being stored, and create the directory if needed.
    pub async fn setup_directory(
        maybe_custom_path: Option<std::path::PathBuf>,
        state: &std::sync::Arc<SharedState>,
    ) -> Result<()> {
        let path = match maybe_custom_path {
            None => Self::default_directory()?,
            Some(path_string) => std::path::PathBuf::new().join(path_string),
        };

        std::fs::create_dir_all(path.clone())?;
        *state.config_path.write().await = path;

        Ok(())
    }

    /// Canonical path to the main config file.
    pub async fn main_config_path(state: &std::sync::Arc<SharedState>) -> std::path::PathBuf {
        let directory = Self::directory(state).await;
        let main_config_file = state.main_config_file.read().await.clone();
        directory.join(main_config_file)
    }

    /// Load the main config
    pub async fn load(state: &std::sync::Arc<SharedState>) -> Result<Self> {
        let config_path = Self::main_config_path(state).await;
        let config_file_name = config_path
            .file_name()
            .context("Couldn't get file name from config path")?;
        let is_default_config = config_file_name == crate::cli_args::DEFAULT_CONFIG_FILE_NAME;
        if is_default_config && !config_path.exists() {
            std::fs::write(config_path.clone(), DEFAULT_CONFIG)?;
        }

        tracing::info!("Loading the main Folio config from: {config_path:?}");
        let result = std::fs::read_to_string(config_path.clone());
        match result {
            Ok(data) => {
                tracing::trace!("Using config file:\n{data}");
                Ok(toml::from_str::<Self>(&data)?)
            }
            Err(err) => {
                tracing::error!("Loading config: {err:?}");
                color_eyre::eyre::bail!(
                    "Couldn't load config at {config_path:?}: {}",
                    err.to_string()
                );
            }
        }
    }

    /// Parse the shipped default config.
    pub fn parse_default_config() -> Result<Self> {
        Ok(toml::from_str::<Self>(DEFAULT_CONFIG)?)
    }

    /// Load the main config
    pub async fn load_config_into_shared_state(
        state: &std::sync::Arc<SharedState>,
    ) -> Result<Self> {
        let mut config_state = state.config.write().await;
        let new_config = Self::load(state).await?;
        *config_state = new_config.clone();
        drop(config_state);

        Ok(new_config)
    }
}
