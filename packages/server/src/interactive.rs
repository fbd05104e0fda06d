//! Interactive mode for the server.
//!
//! Prompts for the bind address, port, and dataset source before starting
//! the server.

use age_map_source::DataSourceConfig;
use dialoguer::{Confirm, Input, Select};

use crate::ServerSettings;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Defaults for every prompt come from [`ServerSettings::from_env`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("Age Map Server");
    println!();

    let defaults = ServerSettings::from_env();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| defaults.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()
        .unwrap_or(defaults.port);

    let sources = prompt_sources(defaults.sources);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(ServerSettings {
        bind_addr,
        port,
        sources,
    })
    .await
}

fn prompt_sources(defaults: DataSourceConfig) -> DataSourceConfig {
    let choice = Select::new()
        .with_prompt("Load datasets from")
        .items(&["Configured defaults", "Upstream API"])
        .default(0)
        .interact()
        .unwrap_or(0);

    if choice == 0 {
        return defaults;
    }

    let base_url: String = Input::new()
        .with_prompt("Upstream base URL")
        .default("http://localhost:8000".to_string())
        .interact_text()
        .unwrap_or_else(|_| "http://localhost:8000".to_string());

    DataSourceConfig::upstream(base_url)
}
