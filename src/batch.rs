//! Split a run in batches of contiguous records and build them.

/* project use */
use crate::config::GenerationConfig;
use crate::error;
use crate::record;

/// Describe a batch a worker should build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub batch_index: u64,
    pub start_id: u64,
    pub count: u64,
    pub is_last_batch: bool,
}

/// Records of a batch, owned by the worker build it until it's send to writer
#[derive(Debug, PartialEq, Eq)]
pub struct Batch {
    pub batch_index: u64,
    pub start_id: u64,
    pub records: Vec<record::SequenceRecord>,
}

impl Batch {
    /// Number of records in batch
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return true if the batch is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Split `num_sequences` records in batches of `batch_size`, only the last batch can be shorter
///
/// Exactly one descriptor is flag as last batch, the one contains record `num_sequences - 1`.
pub fn partition(num_sequences: u64, batch_size: u64) -> Vec<Descriptor> {
    if num_sequences == 0 {
        return Vec::new();
    }

    let batch_size = batch_size.min(num_sequences).max(1);
    let num_batches = (num_sequences - 1) / batch_size + 1;

    (0..num_batches)
        .map(|batch_index| {
            let start_id = batch_index * batch_size;

            Descriptor {
                batch_index,
                start_id,
                count: batch_size.min(num_sequences - start_id),
                is_last_batch: batch_index == num_batches - 1,
            }
        })
        .collect()
}

/// Generate all records of a batch
pub fn build(descriptor: &Descriptor, config: &GenerationConfig) -> error::Result<Batch> {
    let last_id = descriptor.start_id + descriptor.count;

    let records = (descriptor.start_id..last_id)
        .map(|id| record::generate(id, config, descriptor.is_last_batch && id + 1 == last_id))
        .collect::<error::Result<Vec<record::SequenceRecord>>>()?;

    Ok(Batch {
        batch_index: descriptor.batch_index,
        start_id: descriptor.start_id,
        records,
    })
}
