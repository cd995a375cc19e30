//! Inbound and outbound batch channels.
//!
//! A channel moves whole batches: one inbound payload is one JSON array of
//! descriptors, one outbound message is one JSON array of response records.
//! `receive` must be cancel-safe; the consumer wraps it in a timeout.

use async_trait::async_trait;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{trace, warn};

use crate::error::{Result, RuntimeError};

/// Source of request batches.
#[async_trait]
pub trait InboundChannel: Send {
    /// Waits for the next payload. `None` means the channel is closed.
    async fn receive(&mut self) -> Result<Option<String>>;
}

/// Sink for response batches.
#[async_trait]
pub trait OutboundChannel: Send {
    /// Publishes one encoded response batch.
    async fn publish(&mut self, batch: String) -> Result<()>;

    /// Forces buffered batches out.
    async fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Inbound half fed through a tokio channel.
pub struct MemoryInbound {
    rx: mpsc::Receiver<String>,
}

/// Creates an in-memory inbound channel and the sender that feeds it.
pub fn memory_inbound(capacity: usize) -> (mpsc::Sender<String>, MemoryInbound) {
    let (tx, rx) = mpsc::channel(capacity);
    (tx, MemoryInbound { rx })
}

#[async_trait]
impl InboundChannel for MemoryInbound {
    async fn receive(&mut self) -> Result<Option<String>> {
        Ok(self.rx.recv().await)
    }
}

/// Outbound half whose batches can be read back from a tokio channel.
pub struct MemoryOutbound {
    tx: mpsc::UnboundedSender<String>,
}

/// Creates an in-memory outbound channel and the receiver that drains it.
pub fn memory_outbound() -> (MemoryOutbound, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MemoryOutbound { tx }, rx)
}

#[async_trait]
impl OutboundChannel for MemoryOutbound {
    async fn publish(&mut self, batch: String) -> Result<()> {
        self.tx
            .send(batch)
            .map_err(|_| RuntimeError::Channel("outbound receiver dropped".to_string()))
    }
}

/// Reads one payload per line. Blank lines are skipped, and so are lines
/// that are not valid UTF-8.
pub struct LineInbound<R> {
    reader: R,
    // Bytes of the current line; survives a cancelled `receive`.
    buf: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin + Send> LineInbound<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl LineInbound<BufReader<io::Stdin>> {
    /// Reads payloads from standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> InboundChannel for LineInbound<R> {
    async fn receive(&mut self) -> Result<Option<String>> {
        loop {
            let read = self.reader.read_until(b'\n', &mut self.buf).await?;
            if read == 0 && self.buf.is_empty() {
                return Ok(None);
            }

            let raw = std::mem::take(&mut self.buf);
            match String::from_utf8(raw) {
                Ok(line) => {
                    let line = line.trim_end_matches(|c| c == '\n' || c == '\r');
                    if line.trim().is_empty() {
                        trace!("skipping blank line");
                    } else {
                        return Ok(Some(line.to_string()));
                    }
                }
                Err(e) => warn!(
                    error = %e.utf8_error(),
                    len = e.as_bytes().len(),
                    "dropping inbound line that is not valid UTF-8"
                ),
            }
        }
    }
}

/// Writes one response batch per line.
pub struct LineOutbound<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin + Send> LineOutbound<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl LineOutbound<io::Stdout> {
    /// Writes batches to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> OutboundChannel for LineOutbound<W> {
    async fn publish(&mut self, batch: String) -> Result<()> {
        self.writer.write_all(batch.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_inbound_closes() {
        let (tx, mut inbound) = memory_inbound(4);
        tx.send("[]".to_string()).await.unwrap();
        drop(tx);

        assert_eq!(inbound.receive().await.unwrap(), Some("[]".to_string()));
        assert_eq!(inbound.receive().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_line_inbound_skips_blank_lines() {
        let input: &[u8] = b"[1]\n\n   \n[2]\n";
        let mut inbound = LineInbound::new(BufReader::new(input));

        assert_eq!(inbound.receive().await.unwrap(), Some("[1]".to_string()));
        assert_eq!(inbound.receive().await.unwrap(), Some("[2]".to_string()));
        assert_eq!(inbound.receive().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_line_inbound_skips_invalid_utf8() {
        let input: &[u8] = b"\xff\xfe\n[1]\r\n[2]";
        let mut inbound = LineInbound::new(BufReader::new(input));

        assert_eq!(inbound.receive().await.unwrap(), Some("[1]".to_string()));
        assert_eq!(inbound.receive().await.unwrap(), Some("[2]".to_string()));
        assert_eq!(inbound.receive().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_line_outbound_writes_lines() {
        let mut outbound = LineOutbound::new(Vec::new());
        outbound.publish("[1]".to_string()).await.unwrap();
        outbound.publish("[2]".to_string()).await.unwrap();
        outbound.flush().await.unwrap();

        assert_eq!(outbound.into_inner(), b"[1]\n[2]\n".to_vec());
    }

    #[tokio::test]
    async fn test_memory_outbound_fails_without_receiver() {
        let (mut outbound, rx) = memory_outbound();
        drop(rx);

        assert!(matches!(
            outbound.publish("[]".to_string()).await,
            Err(RuntimeError::Channel(_))
        ));
    }
}
