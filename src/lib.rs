//! Generate fastq test fixtures of random reads ended by a poly-X tail.
//!
//! Records are generated by batch on a pool of workers, and written in id order whatever the order batches are completed.
//! Each record header contains its ground truth, tail length and tail start, and quality string mark the body/tail junction.
//! Same seed produce same bytes whatever the number of workers or the batch size.

/* mod declaration */
pub mod batch;
pub mod block;
pub mod check;
pub mod config;
pub mod error;
pub mod fastq;
pub mod pool;
pub mod record;
pub mod run;
pub mod writer;

pub use config::GenerationConfig;
pub use run::generate;

/// Default max length of a record
pub const DEFAULT_MAX_LENGTH: usize = 1000;

/// Default max length of the poly-X tail
pub const DEFAULT_MAX_POLYTAIL: usize = 100;

/// Default number of records
pub const DEFAULT_NUM_SEQUENCES: u64 = 1000;

/// Default number of records per batch
pub const DEFAULT_BATCH_SIZE: u64 = 10_000;

/// Default size of block read by [fastq::block::Producer]
pub const DEFAULT_BLOCKSIZE: u64 = 8_192;
