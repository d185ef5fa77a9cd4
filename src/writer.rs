//! Write batches in sink in batch index order, whatever the order they are received.

/* std use */
use std::io::Write;

/* project use */
use crate::batch::Batch;
use crate::error;

/// Progress of a run, send after each batch written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub batch_index: u64,
    pub num_batches: u64,
    pub written: u64,
    pub total: u64,
}

impl Progress {
    /// Percent of records written
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            100.0 * self.written as f64 / self.total as f64
        }
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Generated batch {}/{} - {} of {} sequences ({:.2}%)",
            self.batch_index + 1,
            self.num_batches,
            self.written,
            self.total,
            self.percent()
        )
    }
}

/// Reorder buffer in front of sink
///
/// Batch `next_expected` is written as soon as it's received, followed by any consecutive batch already hold.
/// Other batches wait in holding area.
pub struct OrderedWriter<W, F>
where
    W: Write,
    F: FnMut(&Progress),
{
    sink: W,
    next_expected: u64,
    num_batches: u64,
    pending: rustc_hash::FxHashMap<u64, Batch>,
    written: u64,
    total: u64,
    buffer: Vec<u8>,
    on_progress: F,
}

impl<W, F> OrderedWriter<W, F>
where
    W: Write,
    F: FnMut(&Progress),
{
    /// Create a writer expect `num_batches` batches contains `total` records
    pub fn new(sink: W, num_batches: u64, total: u64, on_progress: F) -> Self {
        Self {
            sink,
            next_expected: 0,
            num_batches,
            pending: rustc_hash::FxHashMap::default(),
            written: 0,
            total,
            buffer: Vec::new(),
            on_progress,
        }
    }

    /// Index of the next batch to write
    pub fn next_expected(&self) -> u64 {
        self.next_expected
    }

    /// Number of records already written
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Sink, contains only whole batches
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Number of batches received but not yet written
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Return true if all batches are written
    pub fn is_complete(&self) -> bool {
        self.next_expected == self.num_batches
    }

    /// Receive a batch, write it and any following batch already hold if it's the next expected
    pub fn push(&mut self, batch: Batch) -> error::Result<()> {
        if batch.batch_index < self.next_expected
            || batch.batch_index >= self.num_batches
            || self.pending.contains_key(&batch.batch_index)
        {
            return Err(error::Error::UnexpectedBatch {
                batch_index: batch.batch_index,
                next_expected: self.next_expected,
            });
        }

        if batch.batch_index != self.next_expected {
            log::trace!(
                "Hold batch {} wait batch {}",
                batch.batch_index,
                self.next_expected
            );
            self.pending.insert(batch.batch_index, batch);
            return Ok(());
        }

        self.flush_batch(batch)?;
        while let Some(batch) = self.pending.remove(&self.next_expected) {
            self.flush_batch(batch)?;
        }

        Ok(())
    }

    /// Flush sink and give it back, fail if some batches are missing
    pub fn finish(mut self) -> error::Result<W> {
        if !self.is_complete() {
            return Err(error::Error::IncompleteRun {
                missing: self.num_batches - self.next_expected,
            });
        }

        self.sink
            .flush()
            .map_err(|source| error::Error::Sink {
                batch_index: self.num_batches.saturating_sub(1),
                source,
            })?;

        Ok(self.sink)
    }

    fn flush_batch(&mut self, batch: Batch) -> error::Result<()> {
        let batch_index = batch.batch_index;

        self.buffer.clear();
        for record in &batch.records {
            record
                .write_fastq(&mut self.buffer)
                .map_err(|source| error::Error::Sink {
                    batch_index,
                    source,
                })?;
        }

        self.sink
            .write_all(&self.buffer)
            .map_err(|source| error::Error::Sink {
                batch_index,
                source,
            })?;

        self.next_expected += 1;
        self.written += batch.len() as u64;

        (self.on_progress)(&Progress {
            batch_index,
            num_batches: self.num_batches,
            written: self.written,
            total: self.total,
        });

        Ok(())
    }
}
