//! The single consuming loop.

use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use rtypes_dispatch::{encode_batch, OperationDispatcher};

use crate::channel::{InboundChannel, OutboundChannel};
use crate::config::RuntimeConfig;
use crate::error::Result;

/// Counters reported when the consumer stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    /// Payloads taken from the inbound channel.
    pub batches_received: u64,
    /// Response batches handed to the outbound channel.
    pub batches_published: u64,
    /// Payloads dropped because they could not be decoded.
    pub batches_dropped: u64,
    /// Response records published in total.
    pub records_published: u64,
}

/// Drains the inbound channel one batch at a time.
///
/// Every operation of a batch runs, in order, before its response batch is
/// published and the next payload is taken.
pub struct BatchConsumer<I, O> {
    dispatcher: OperationDispatcher,
    inbound: I,
    outbound: O,
    config: RuntimeConfig,
    shutdown: watch::Receiver<bool>,
    stats: ConsumerStats,
}

impl<I: InboundChannel, O: OutboundChannel> BatchConsumer<I, O> {
    pub fn new(
        dispatcher: OperationDispatcher,
        inbound: I,
        outbound: O,
        config: RuntimeConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            dispatcher,
            inbound,
            outbound,
            config,
            shutdown,
            stats: ConsumerStats::default(),
        }
    }

    /// Runs until the inbound channel closes or shutdown is signalled.
    pub async fn run(mut self) -> Result<ConsumerStats> {
        let poll_timeout = self.config.poll_timeout;
        debug!(
            poll_timeout_ms = poll_timeout.as_millis() as u64,
            "starting batch consumer"
        );

        loop {
            if *self.shutdown.borrow() {
                debug!("consumer received shutdown signal");
                break;
            }

            let payload = tokio::select! {
                received = timeout(poll_timeout, self.inbound.receive()) => match received {
                    Err(_) => {
                        trace!("no batch within poll timeout");
                        continue;
                    }
                    Ok(received) => match received? {
                        Some(payload) => payload,
                        None => {
                            debug!("inbound channel closed");
                            break;
                        }
                    },
                },
                changed = self.shutdown.changed() => {
                    if changed.is_err() {
                        debug!("shutdown sender dropped");
                        break;
                    }
                    continue;
                }
            };

            self.handle(payload).await?;
        }

        debug!(
            batches_received = self.stats.batches_received,
            batches_published = self.stats.batches_published,
            batches_dropped = self.stats.batches_dropped,
            "batch consumer stopped"
        );
        Ok(self.stats)
    }

    async fn handle(&mut self, payload: String) -> Result<()> {
        self.stats.batches_received += 1;

        // Collections save synchronously. The consumer is the only task
        // driving the dispatcher, so a blocked worker stalls nothing else.
        let records = match self.dispatcher.process_payload(&payload) {
            Ok(Some(records)) => records,
            Ok(None) => {
                trace!("batch produced no records");
                return Ok(());
            }
            Err(e) => {
                warn!(error = %e, payload = %payload, "dropping malformed batch");
                self.stats.batches_dropped += 1;
                return Ok(());
            }
        };

        let encoded = encode_batch(&records)?;
        self.outbound.publish(encoded).await?;
        if self.config.flush_on_publish {
            self.outbound.flush().await?;
        }

        self.stats.batches_published += 1;
        self.stats.records_published += records.len() as u64;
        trace!(records = records.len(), "published response batch");
        Ok(())
    }
}
