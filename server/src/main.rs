mod command;
mod config;
mod fleet;
mod session;

use std::sync::Arc;

use command::Dispatcher;
use config::RelayConfig;
use fleet::{DroneStore, MemoryDroneStore, SimulatedFeed, TelemetrySource};
use session::SessionManager;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = RelayConfig::from_env();

    let store: Arc<dyn DroneStore> = Arc::new(MemoryDroneStore::with_demo_drone());
    let feed: Arc<dyn TelemetrySource> = Arc::new(SimulatedFeed);
    let sessions = Arc::new(SessionManager::new());
    let dispatcher = Arc::new(Dispatcher::new(
        sessions.clone(),
        store,
        feed,
        config.clone(),
    ));

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Relay listening on {}", config.bind_addr);

    loop {
        let (stream, addr) = listener.accept().await?;
        let sessions = sessions.clone();
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            session::connection::run(stream, addr, sessions, dispatcher).await;
        });
    }
}
