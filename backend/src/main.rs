//! User registry entry-point: loads settings, opens the store and serves the
//! REST API with OpenAPI docs.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::WrapErr;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use user_registry::domain::UserRegistryService;
use user_registry::inbound::http::health::HealthState;
use user_registry::inbound::http::state::HttpState;
use user_registry::outbound::persistence::JsonFileUserStore;
use user_registry::settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("load configuration")?;
    let bind_addr = settings
        .bind_addr()
        .wrap_err_with(|| format!("invalid bind host {}", settings.host()))?;

    let data_file = settings.data_file();
    let store = JsonFileUserStore::open(&data_file)
        .wrap_err_with(|| format!("open user store at {}", data_file.display()))?;
    info!(path = %store.path(), "user store opened");

    let registry = Arc::new(UserRegistryService::new(store));
    let config = ServerConfig::new(bind_addr, HttpState::from_registry(registry));
    info!(addr = %config.bind_addr(), "starting user registry");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}

#[cfg(test)]
mod tests;
