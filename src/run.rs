//! Drive a generation run, from configuration to a sink fill with records.

/* std use */
use std::io::Write;

/* project use */
use crate::batch;
use crate::config::GenerationConfig;
use crate::error;
use crate::pool::WorkerPool;
use crate::writer::{OrderedWriter, Progress};

/// Generate all records describe by `config` in `sink`, progress is report with log
pub fn generate<W>(config: &GenerationConfig, sink: W) -> error::Result<W>
where
    W: Write,
{
    with_progress(config, sink, |progress| log::info!("{}", progress))
}

/// Generate all records describe by `config` in `sink`, `on_progress` is call after each batch written
///
/// Config is validate before any byte is written. Sink is flush and return, caller is responsible to close it.
pub fn with_progress<W, F>(config: &GenerationConfig, sink: W, on_progress: F) -> error::Result<W>
where
    W: Write,
    F: FnMut(&Progress),
{
    config.validate()?;

    let descriptors = batch::partition(config.num_sequences, config.batch_size);
    let num_batches = descriptors.len() as u64;

    log::info!(
        "Start generate {} sequences in {} batches using {} threads",
        config.num_sequences,
        num_batches,
        config.worker_count
    );

    let pool = WorkerPool::new(config.worker_count)?;
    let mut writer = OrderedWriter::new(sink, num_batches, config.num_sequences, on_progress);

    pool.execute(descriptors, config, |batch| writer.push(batch))?;

    let sink = writer.finish()?;

    log::info!(
        "End generate {} sequences with max length {} and max polytail {}",
        config.num_sequences,
        config.max_length,
        config.max_polytail
    );

    Ok(sink)
}
