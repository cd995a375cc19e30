//! Command handlers for CLI subcommands.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rtypes_collections::ObjectFactory;
use rtypes_dispatch::{encode_batch, OperationDispatcher};
use rtypes_runtime::{LineInbound, LineOutbound, Runtime, RuntimeConfig};
use tracing::info;

use crate::cli::Commands;

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Execute a CLI command.
pub fn execute(command: Commands, storage_dir: &Path) -> Result<()> {
    match command {
        Commands::Serve {
            poll_timeout_ms,
            no_flush,
        } => {
            let config = RuntimeConfig::new()
                .with_poll_timeout(Duration::from_millis(poll_timeout_ms))
                .with_flush_on_publish(!no_flush);
            cmd_serve(storage_dir, config)
        }
        Commands::Exec { file, pretty } => cmd_exec(storage_dir, &file, pretty),
    }
}

fn open_dispatcher(storage_dir: &Path) -> Result<OperationDispatcher> {
    let factory = ObjectFactory::open(storage_dir)?;
    info!(storage_dir = %storage_dir.display(), "opened collection storage");
    Ok(OperationDispatcher::new(Arc::new(factory)))
}

fn cmd_serve(storage_dir: &Path, config: RuntimeConfig) -> Result<()> {
    let dispatcher = open_dispatcher(storage_dir)?;
    let tokio_runtime = tokio::runtime::Runtime::new()?;

    tokio_runtime.block_on(async move {
        let mut runtime = Runtime::new(dispatcher, config);
        runtime.start(LineInbound::stdin(), LineOutbound::stdout())?;

        let finished = tokio::select! {
            stats = runtime.wait() => Some(stats),
            _ = tokio::signal::ctrl_c() => None,
        };
        let stats = match finished {
            Some(stats) => stats?,
            None => {
                info!("interrupted");
                runtime.shutdown().await?
            }
        };

        info!(
            batches = stats.batches_received,
            published = stats.batches_published,
            dropped = stats.batches_dropped,
            "serve finished"
        );
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

fn cmd_exec(storage_dir: &Path, file: &Path, pretty: bool) -> Result<()> {
    let payload = read_payload(file)?;
    let dispatcher = open_dispatcher(storage_dir)?;
    if let Some(output) = run_exec(&dispatcher, &payload, pretty)? {
        println!("{}", output);
    }
    Ok(())
}

/// Runs one payload and renders the response batch, if any.
pub fn run_exec(dispatcher: &OperationDispatcher, payload: &str, pretty: bool) -> Result<Option<String>> {
    let records = match dispatcher.process_payload(payload)? {
        Some(records) => records,
        None => return Ok(None),
    };
    let rendered = if pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        encode_batch(&records)?
    };
    Ok(Some(rendered))
}

fn read_payload(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut payload = String::new();
        std::io::stdin().read_to_string(&mut payload)?;
        Ok(payload)
    } else {
        Ok(std::fs::read_to_string(file)?)
    }
}
