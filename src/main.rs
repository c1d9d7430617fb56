use actix_server::ServerHandle;
use actix_web::{
    App, HttpServer,
    web::{self, Data},
};
use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use esp_settings_ui::{
    api::Api,
    config::AppConfig,
    device_client::EspDeviceClient,
    settings::{
        SettingsForm,
        render::{DEFAULTS_PATH, RESTART_PATH, SUBMIT_PATH},
    },
    services::wifi::CONNECT_PATH,
};
use log::{debug, error, info};
use std::io::Write;
use tokio::signal::unix::{SignalKind, signal};

type UiApi = Api<EspDeviceClient>;

#[actix_web::main]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    initialize();

    let config = AppConfig::get().context("failed to load application configuration")?;

    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;

    let device_client =
        EspDeviceClient::new(&config.device.url).context("failed to create device client")?;
    info!("device at {}", device_client.base_url());

    let (server_handle, server_task) = run_server(config, device_client)?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            debug!("ctrl-c received");
        },
        _ = sigterm.recv() => {
            debug!("SIGTERM received");
        },
        result = server_task => {
            match result {
                Ok(Ok(())) => debug!("server stopped normally"),
                Ok(Err(e)) => error!("server stopped with error: {e}"),
                Err(e) => error!("server task panicked: {e}"),
            }
        },
    }

    info!("shutting down");
    server_handle.stop(true).await;
    info!("shutdown complete");

    Ok(())
}

fn initialize() {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    builder.target(Target::Stdout).init();

    info!(
        "module version: {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_SHORT_REV")
    );
}

fn run_server(
    config: &AppConfig,
    device_client: EspDeviceClient,
) -> Result<(
    ServerHandle,
    tokio::task::JoinHandle<Result<(), std::io::Error>>,
)> {
    let api = Data::new(UiApi::new(
        device_client,
        SettingsForm::new(config.ui.timezones.clone()),
        config.ui.icon_size,
    ));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(api.clone())
            .route("/", web::get().to(UiApi::index))
            .route(SUBMIT_PATH, web::post().to(UiApi::submit_settings))
            .route(DEFAULTS_PATH, web::get().to(UiApi::confirm_defaults))
            .route(DEFAULTS_PATH, web::post().to(UiApi::reset_defaults))
            .route(RESTART_PATH, web::get().to(UiApi::confirm_restart))
            .route(RESTART_PATH, web::post().to(UiApi::restart))
            .route("/wifi", web::get().to(UiApi::wifi))
            .route("/wifi/scan", web::get().to(UiApi::wifi_scan))
            .route(CONNECT_PATH, web::post().to(UiApi::wifi_connect))
            .route("/wifi/icon.svg", web::get().to(UiApi::wifi_icon))
            .route("/version", web::get().to(UiApi::version))
            .route("/healthcheck", web::get().to(UiApi::healthcheck))
    })
    .bind((config.ui.bind_address, config.ui.port))
    .context("failed to bind server")?
    .disable_signals()
    .run();

    info!(
        "listening on {}:{}",
        config.ui.bind_address, config.ui.port
    );

    Ok((server.handle(), tokio::spawn(server)))
}
