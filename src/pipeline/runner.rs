use super::channel::{create_channel, Receiver, Sender};
use crate::slowlog::{is_noise, render, SlowLogParser, SlowQueryEvent};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

/// Errors that can occur while moving events from raw text into the sink
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to write slow log '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Counts from one writer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub written: usize,
    pub discarded: usize,
}

/// Run the parser task.
///
/// Splits `text` into events and pushes each one to the writer in source
/// order. Returns the number of events parsed.
pub async fn run_parser(text: String, output: Sender<SlowQueryEvent>) -> usize {
    let mut parsed = 0;
    for event in SlowLogParser::new(&text) {
        parsed += 1;
        if output.send(event).is_err() {
            warn!("Event channel closed, stopping parser");
            break;
        }
    }
    debug!(parsed, "Parser finished");
    parsed
}

/// Run the writer task.
///
/// Drops noise events, renders the rest and appends them to the slow log at
/// `sink`. Each block is flushed as soon as it is written; the first write
/// failure stops the stream.
pub async fn run_writer(
    mut input: Receiver<SlowQueryEvent>,
    sink: &Path,
) -> Result<WriteStats, PipelineError> {
    let io_err = |source: std::io::Error| PipelineError::Io {
        path: sink.to_path_buf(),
        source,
    };

    if let Some(parent) = sink.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(sink)
        .await
        .map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    let mut stats = WriteStats::default();
    while let Some(event) = input.recv().await {
        if is_noise(&event) {
            stats.discarded += 1;
            continue;
        }

        writer
            .write_all(render(&event).as_bytes())
            .await
            .map_err(io_err)?;
        writer.flush().await.map_err(io_err)?;
        stats.written += 1;
    }

    Ok(stats)
}

/// Push `text` through the parser and writer tasks into `sink`.
pub async fn process_text(text: String, sink: &Path) -> Result<WriteStats, PipelineError> {
    let (tx, rx) = create_channel::<SlowQueryEvent>();

    let parser_handle = tokio::spawn(run_parser(text, tx));

    let sink_path = sink.to_path_buf();
    let writer_handle = tokio::spawn(async move { run_writer(rx, &sink_path).await });

    let writer_result = writer_handle.await?;
    let parsed = parser_handle.await?;
    let stats = writer_result?;

    info!(
        sink = %sink.display(),
        parsed,
        written = stats.written,
        discarded = stats.discarded,
        "Appended slow log events"
    );
    Ok(stats)
}
