use crate::{
    backend::{Storage, StorageResult},
    configuration::Configuration,
    configuration_handler::ConfigurationHandler,
    database_interface::DatabaseInterface,
    http::create_app,
    volatile_storage::VolatileStorage,
};
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod availability;
mod backend;
mod configuration;
mod configuration_handler;
mod database_interface;
mod error;
mod fixtures;
mod http;
mod identifier;
mod schema;
#[cfg(test)]
mod testutils;
mod types;
mod volatile_storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("#################");
    println!("# Class Booking #");
    println!("#################");

    let configuration = ConfigurationHandler::parse_arguments();

    let address = format!("{}:{}", configuration.host(), configuration.port());
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to listen on {address}"))?;
    println!("Accessible at:\n{address}");

    if let Some(database_path) = configuration.database_path() {
        let storage = DatabaseInterface::new(&database_path)
            .with_context(|| format!("failed to open database {database_path}"))?;
        info!(%database_path, "using SQLite database");
        serve(listener, storage).await
    } else {
        info!("using in-memory storage, all data will be lost on exit");
        serve(listener, VolatileStorage::new()).await
    }
}

/// Runs the server until Ctrl-C, then closes the storage whatever the outcome.
async fn serve<T: Storage>(listener: TcpListener, storage: T) -> anyhow::Result<()> {
    let served = axum::serve(listener, create_app(storage.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    shutdown_result(served, storage.close())
}

/// A server error wins over a close error; the close error is still logged.
fn shutdown_result(served: std::io::Result<()>, closed: StorageResult<()>) -> anyhow::Result<()> {
    match &closed {
        Ok(()) => info!("storage closed"),
        Err(err) => error!(%err, "failed to close storage"),
    }
    served.context("server stopped unexpectedly")?;
    closed.context("failed to close storage")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(?err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
