//! # Exam Proctor Runtime
//!
//! Server process for the proctoring platform: one ledger, one lifecycle
//! service and the HTTP gateway, all sharing an in-memory submission store.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (file, then environment overrides)
//! 2. Initialize logging and metrics
//! 3. Build subsystems in dependency order ([`container`])
//! 4. Spawn the timeout sweeper ([`wiring`])
//! 5. Serve HTTP until shutdown
//!
//! ## Shutdown
//!
//! A single `watch` channel fans the shutdown signal out to the sweeper and
//! the server's graceful-shutdown future.

pub mod container;
pub mod wiring;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub use container::{ConfigError, ProctorConfig, ProctorContainer};
pub use wiring::{run_timeout_sweeper, TimeoutSweeper};

/// Handles to the tasks started by [`ProctorRuntime::start`].
pub struct RuntimeHandles {
    pub local_addr: SocketAddr,
    pub server: JoinHandle<()>,
    pub sweeper: JoinHandle<usize>,
}

/// Owns the container and the shutdown channel.
pub struct ProctorRuntime {
    config: ProctorConfig,
    container: ProctorContainer,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl ProctorRuntime {
    pub fn new(config: ProctorConfig) -> Result<Self> {
        let container = ProctorContainer::new(&config).context("failed to build subsystems")?;
        Ok(Self::with_container(config, container))
    }

    pub fn with_container(config: ProctorConfig, container: ProctorContainer) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            config,
            container,
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub fn container(&self) -> &ProctorContainer {
        &self.container
    }

    pub fn config(&self) -> &ProctorConfig {
        &self.config
    }

    /// Binds the configured address and starts all tasks.
    pub async fn start(&self) -> Result<RuntimeHandles> {
        let addr = self.config.gateway().http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        self.start_on(listener)
    }

    /// Starts all tasks on an already bound listener.
    pub fn start_on(&self, listener: TcpListener) -> Result<RuntimeHandles> {
        let local_addr = listener.local_addr().context("listener has no local address")?;
        let gateway = self
            .container
            .gateway(&self.config)
            .context("failed to build API gateway")?;

        let sweeper = run_timeout_sweeper(
            self.container.lifecycle.clone(),
            self.config.lifecycle.sweep_interval,
            self.shutdown_rx.clone(),
        );

        let mut shutdown = self.shutdown_rx.clone();
        let server = tokio::spawn(async move {
            let signal = async move {
                let _ = shutdown.wait_for(|stop| *stop).await;
            };
            if let Err(e) = gateway.serve_on(listener, signal).await {
                error!(error = %e, "API gateway stopped with error");
            }
        });

        info!(addr = %local_addr, "Proctor runtime started");
        Ok(RuntimeHandles {
            local_addr,
            server,
            sweeper,
        })
    }

    /// Signals every task to stop.
    pub fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        let _ = self.shutdown_tx.send(true);
    }
}
