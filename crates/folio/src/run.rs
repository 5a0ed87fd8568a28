//! Main entrypoint for running Folio

use std::sync::Arc;

use clap::Parser as _;
use color_eyre::eyre::{ContextCompat as _, Result};
use particle_field::{Animation, FrameTicker, ParticleField};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, Layer as _};

use crate::cli_args::{CliArgs, Command, ThemeAction};
use crate::config::main::Config;
use crate::page::classes::ClassList;
use crate::page::contact::{ContactForm, Fields, Outcome, SystemNavigator, DEFAULT_SUBMIT_LABEL};
use crate::page::theme::{Mode, Theme};
use crate::page::view::Page;
use crate::renderer::TerminalSurface;
use crate::shared_state::SharedState;
use crate::store::JsonFileStore;
use crate::viewport::TerminalViewport;

/// Main entrypoint
pub async fn run(state_arc: &Arc<SharedState>) -> Result<()> {
    let cli_args = setup(state_arc).await?;
    let config = state_arc.config.read().await.clone();

    match cli_args.command.clone() {
        Some(Command::Contact {
            name,
            email,
            message,
        }) => contact(&config, Fields::new(&name, &email, &message)).await,
        Some(Command::Theme { action }) => theme(action),
        None => show_page(&cli_args, &config).await,
    }
}

/// Show the résumé over the animated particles until the user quits.
async fn show_page(cli_args: &CliArgs, config: &Config) -> Result<()> {
    let users_tty_size = crate::renderer::get_users_tty_size()?;
    let viewport = TerminalViewport::new(
        users_tty_size.cols,
        users_tty_size.rows,
        config.pixel_scale,
    );

    let store = JsonFileStore::open(JsonFileStore::default_path())?;
    let page = Page::new(
        &config.resume,
        Theme::new(Box::new(store)),
        config.row_height(),
    );

    let (page_tx, page_rx) = tokio::sync::mpsc::unbounded_channel();
    let terminal = crate::renderer::get_termwiz_terminal()?;
    let mut surface = TerminalSurface::new(terminal, page, page_rx, viewport.clone())?;
    let input_thread_handle = crate::input::Input::start(viewport.clone(), page_tx);

    let field = match cli_args.seed {
        Some(seed) => ParticleField::with_seed(config.particles.clone(), seed),
        None => ParticleField::new(config.particles.clone()),
    };
    let mut animation = Animation::new(field);
    let mut ticker = FrameTicker::new(config.frame_rate, cli_args.frames);

    let result = animate(&mut animation, &viewport, &mut surface, &mut ticker).await;
    surface.restore()?;
    let frames = result?;
    tracing::debug!("🏁 Animation finished after {frames} frames");

    if input_thread_handle.is_finished() {
        // The STDIN loop blocks on reading, so it can't be told to exit. Therefore we should only
        // join it if it finished due of its own error.
        input_thread_handle
            .join()
            .map_err(|err| color_eyre::eyre::eyre!("STDIN handle: {err:?}"))??;
    }

    tracing::trace!("Leaving Folio's `show_page()` function");
    Ok(())
}

/// Start the animation and run it until it's stopped, returning the number of frames drawn.
async fn animate(
    animation: &mut Animation,
    viewport: &TerminalViewport,
    surface: &mut TerminalSurface<impl termwiz::terminal::Terminal>,
    ticker: &mut FrameTicker,
) -> Result<u64> {
    animation.start(viewport, surface)?;
    Ok(animation.run(surface, ticker).await?)
}

/// Send a message through the contact form, printing its status as it changes.
#[expect(
    clippy::print_stdout,
    reason = "It's our central place for communicating with the user on CLI"
)]
async fn contact(config: &Config, fields: Fields) -> Result<()> {
    let mut form = ContactForm::new(
        &config.contact_address,
        DEFAULT_SUBMIT_LABEL,
        SystemNavigator,
    );
    form.fields = fields;

    let mut status = form.subscribe();
    let printer = tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let current = status.borrow_and_update().clone();
            if !current.text.is_empty() {
                println!("{}", current.text);
            }
        }
    });

    let outcome = form.submit().await;
    drop(form);
    printer.await?;

    match outcome? {
        Outcome::Sent(uri) => {
            tracing::info!("Opened {uri}");
            Ok(())
        }
        Outcome::Invalid(error) => color_eyre::eyre::bail!("Message not sent: {error}"),
    }
}

/// Toggle or show the remembered theme.
#[expect(
    clippy::print_stdout,
    reason = "It's our central place for communicating with the user on CLI"
)]
fn theme(action: ThemeAction) -> Result<()> {
    let store = Box::new(JsonFileStore::open(JsonFileStore::default_path())?);
    let mut body = ClassList::default();

    let mode = match action {
        ThemeAction::Toggle => {
            let mut theme = Theme::new(store);
            theme.load(&mut body);
            theme.toggle(&mut body)?
        }
        ThemeAction::Show => {
            Theme::without_toggle(store).load(&mut body);
            Mode::of(&body)
        }
    };
    println!("{mode}");
    Ok(())
}

/// Prepare the application to start.
async fn setup(state: &Arc<SharedState>) -> Result<CliArgs> {
    let cli_args = CliArgs::parse();

    let mut main_config_file = state.main_config_file.write().await;
    (*main_config_file).clone_from(&cli_args.main_config);
    drop(main_config_file);

    let directory_result = Config::setup_directory(cli_args.config_dir.clone(), state).await;
    if let Err(directory_error) = directory_result {
        color_eyre::eyre::bail!("Error setting up config directory: {directory_error:?}");
    }

    let config_result = Config::load_config_into_shared_state(state).await;
    if let Err(config_error) = config_result {
        let path = Config::main_config_path(state).await;
        color_eyre::eyre::bail!(
            "Bad config file: {config_error:?}\n\nConfig path: {}",
            path.display()
        );
    }

    setup_logging(&cli_args, state).await?;

    tracing::info!("Starting Folio");
    tracing::debug!("Loaded config: {:?}", state.config.read().await);

    Ok(cli_args)
}

/// Setup logging
async fn setup_logging(cli_args: &CliArgs, state: &Arc<SharedState>) -> Result<()> {
    let are_log_filters_manually_set = std::env::var("FOLIO_LOG").is_ok();
    let mut path = state.config.read().await.log_path.clone();

    if let Some(cli_override_path) = cli_args.log_path.clone() {
        path.clone_from(&cli_override_path);
        state.config.write().await.log_path = cli_override_path;
    }

    let mut level = state.config.read().await.log_level.clone();
    if let Some(cli_override_level) = cli_args.log_level.clone() {
        level = cli_override_level;
    }
    let level_as_string = format!("{level:?}").to_lowercase();

    let is_loggable =
        !matches!(level, crate::config::main::LogLevel::Off) || are_log_filters_manually_set;

    if !is_loggable {
        return Ok(());
    }

    let directory = path.parent().context("Couldn't get log path's parent")?;
    std::fs::create_dir_all(directory)?;
    let file = std::fs::File::create(path)?;

    let filters = if are_log_filters_manually_set {
        let user_filters = std::env::var("FOLIO_LOG").unwrap_or_default();
        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("error".parse()?)
            .parse_lossy(user_filters)
    } else {
        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("off".parse()?)
            .from_env_lossy()
            .add_directive(format!("folio={level_as_string}").parse()?)
            .add_directive(format!("particle_field={level_as_string}").parse()?)
    };

    let logfile_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_filter(filters);

    tracing_subscriber::registry().with(logfile_layer).init();

    let mut is_logging = state.is_logging.write().await;
    *is_logging = true;
    drop(is_logging);

    Ok(())
}
