//! Parameters of a generation run

/* project use */
use crate::error;

/// Parameters shared read-only by every worker for the whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Max length of a record, body and tail included
    pub max_length: usize,
    /// Max length of the poly-X tail
    pub max_polytail: usize,
    /// Number of record to generate
    pub num_sequences: u64,
    /// Seed of every random draw
    pub seed: u64,
    /// Number of worker generate batch in parallel
    pub worker_count: usize,
    /// Number of record in each batch
    pub batch_size: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_length: crate::DEFAULT_MAX_LENGTH,
            max_polytail: crate::DEFAULT_MAX_POLYTAIL,
            num_sequences: crate::DEFAULT_NUM_SEQUENCES,
            seed: 0,
            worker_count: 1,
            batch_size: crate::DEFAULT_BATCH_SIZE,
        }
    }
}

impl GenerationConfig {
    /// Check parameters are consistent, no record can be generated with an invalid config
    pub fn validate(&self) -> error::Result<()> {
        if self.num_sequences < 1 {
            return Err(invalid("num_sequences must be at least 1".to_string()));
        }

        if self.max_length < 1 {
            return Err(invalid("max_length must be at least 1".to_string()));
        }

        if self.max_polytail < 1 {
            return Err(invalid("max_polytail must be at least 1".to_string()));
        }

        if self.max_polytail > self.max_length {
            return Err(invalid(format!(
                "max_polytail ({}) can't be larger than max_length ({})",
                self.max_polytail, self.max_length
            )));
        }

        if self.batch_size < 1 {
            return Err(invalid("batch_size must be at least 1".to_string()));
        }

        if self.worker_count < 1 {
            return Err(invalid("worker_count must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Number of record really store in each batch
    pub fn effective_batch_size(&self) -> u64 {
        self.batch_size.min(self.num_sequences).max(1)
    }

    /// Number of batch required to generate all records
    pub fn num_batches(&self) -> u64 {
        if self.num_sequences == 0 {
            return 0;
        }

        (self.num_sequences - 1) / self.effective_batch_size() + 1
    }
}

fn invalid(reason: String) -> error::Error {
    error::Error::InvalidConfig { reason }
}
