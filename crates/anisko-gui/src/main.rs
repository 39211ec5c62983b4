mod app;
mod screen;
mod style;
mod subscription;
mod theme;
mod widgets;
mod window_state;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use anisko_api::{AllAnimeClient, HttpCoverSource};
use anisko_core::config::AppConfig;
use anisko_core::launcher::AniCliLauncher;
use anisko_core::storage::PersistentStore;
use anisko_runtime::{FetchCoordinator, Session};

#[derive(Parser, Debug)]
#[command(name = "anisko", about = "Browse the AllAnime catalog and play through ani-cli")]
struct Args {
    /// Directory holding likes, history, profile and cached covers.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(dir) = args.data_dir {
        config.storage.data_dir = Some(dir);
    }
    let data_dir = config.ensure_data_dir()?;

    let file_appender = tracing_appender::rolling::daily(data_dir.join("logs"), "anisko.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("anisko=debug")))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .init();

    tracing::info!(data_dir = %data_dir.display(), "Starting anisko");

    // Fetch workers run here; the iced executor only awaits their handles.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("anisko-fetch")
        .enable_all()
        .build()?;

    let catalog = AllAnimeClient::new(&config.catalog)?;
    let covers = HttpCoverSource::new(&config)?;
    let handle = runtime.handle().clone();
    let program = config.player.program.clone();
    let default_mode = config.general.default_mode;

    let ws = window_state::WindowState::load(&data_dir);
    let mut win = iced::window::Settings {
        size: ws.size(),
        min_size: Some(iced::Size::new(720.0, 480.0)),
        ..Default::default()
    };
    win.position = match ws.position() {
        Some(pos) => iced::window::Position::Specific(pos),
        None => iced::window::Position::Centered,
    };

    iced::application(
        move || {
            let store = PersistentStore::open(&data_dir);
            let coordinator = FetchCoordinator::new(
                catalog.clone(),
                covers.clone(),
                store.covers_dir(),
                handle.clone(),
            );
            let launcher = AniCliLauncher::new(program.clone());
            let session = Session::new(store, coordinator, launcher, default_mode);
            app::Anisko::new(session, ws.clone(), data_dir.clone())
        },
        app::Anisko::update,
        app::Anisko::view,
    )
    .title(app::Anisko::title)
    .subscription(app::Anisko::subscription)
    .theme(app::Anisko::theme)
    .font(lucide_icons::LUCIDE_FONT_BYTES)
    .window(win)
    .run()?;

    drop(runtime);
    Ok(())
}
