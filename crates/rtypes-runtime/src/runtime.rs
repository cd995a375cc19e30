//! Main runtime manager.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use rtypes_dispatch::OperationDispatcher;

use crate::channel::{InboundChannel, OutboundChannel};
use crate::config::RuntimeConfig;
use crate::consumer::{BatchConsumer, ConsumerStats};
use crate::error::{Result, RuntimeError};

/// Owns the consumer task and its shutdown signal.
pub struct Runtime {
    dispatcher: OperationDispatcher,
    config: RuntimeConfig,
    /// Handle to the consumer task.
    consumer_handle: Option<JoinHandle<Result<ConsumerStats>>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Runtime {
    pub fn new(dispatcher: OperationDispatcher, config: RuntimeConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            dispatcher,
            config,
            consumer_handle: None,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Spawns the consumer over the given channels.
    pub fn start<I, O>(&mut self, inbound: I, outbound: O) -> Result<()>
    where
        I: InboundChannel + 'static,
        O: OutboundChannel + 'static,
    {
        if self.consumer_handle.is_some() {
            return Err(RuntimeError::AlreadyStarted);
        }

        info!("starting runtime");

        let consumer = BatchConsumer::new(
            self.dispatcher.clone(),
            inbound,
            outbound,
            self.config.clone(),
            self.shutdown_rx.clone(),
        );
        self.consumer_handle = Some(tokio::spawn(consumer.run()));

        debug!("runtime started");
        Ok(())
    }

    /// Waits for the consumer to finish on its own (inbound channel closed).
    ///
    /// Cancel-safe: if the returned future is dropped, the runtime can still
    /// be shut down.
    pub async fn wait(&mut self) -> Result<ConsumerStats> {
        let handle = self.consumer_handle.as_mut().ok_or(RuntimeError::NotStarted)?;
        let joined = join(handle).await;
        self.consumer_handle = None;
        joined
    }

    /// Signals shutdown and waits for the in-flight batch to complete.
    pub async fn shutdown(&mut self) -> Result<ConsumerStats> {
        let mut handle = self.consumer_handle.take().ok_or(RuntimeError::NotStarted)?;

        info!("shutting down runtime");

        self.shutdown_tx.send(true).map_err(|e| {
            RuntimeError::Shutdown(format!("failed to send shutdown signal: {}", e))
        })?;

        let stats = join(&mut handle).await?;
        info!("runtime stopped");
        Ok(stats)
    }

    pub fn is_started(&self) -> bool {
        self.consumer_handle.is_some()
    }
}

async fn join(handle: &mut JoinHandle<Result<ConsumerStats>>) -> Result<ConsumerStats> {
    handle
        .await
        .map_err(|e| RuntimeError::Shutdown(format!("consumer task panicked: {}", e)))?
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if self.consumer_handle.is_some() {
            let _ = self.shutdown_tx.send(true);
        }
    }
}
