/// Step of a run where an [Error] happen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Generation,
    Writing,
    Reading,
    Checking,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("make_polyx invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("make_polyx failed to generate record {id}, tail length {tail_length} exceed max length {max_length}")]
    Generation {
        id: u64,
        tail_length: usize,
        max_length: usize,
    },

    #[error("make_polyx can't write batch {batch_index} in output {source}")]
    Sink {
        batch_index: u64,
        source: std::io::Error,
    },

    #[error("make_polyx can't build worker pool {source}")]
    WorkerPool { source: rayon::ThreadPoolBuildError },

    #[error("make_polyx receive batch {batch_index} it can't write, next expected batch is {next_expected}")]
    UnexpectedBatch { batch_index: u64, next_expected: u64 },

    #[error("make_polyx stop before end of run, {missing} batch(es) never written")]
    IncompleteRun { missing: u64 },

    #[error("make_polyx failled to read file metadata {source}")]
    MetaDataFile { source: std::io::Error },

    #[error("make_polyx can't open file {source}")]
    OpenFile { source: std::io::Error },

    #[error("make_polyx can't map file on memory {source}")]
    MapFile { source: std::io::Error },

    #[error("make_polyx didn't find new line in block increase block size")]
    NoNewLineInBlock,

    #[error("Input file seems not be a fastq file")]
    NotAFastqFile,

    #[error("make_polyx found a partial record")]
    PartialRecord,

    #[error("record {id} isn't a valid poly-X fixture: {reason}")]
    Check { id: u64, reason: String },
}

impl Error {
    /// Get the [Stage] of run where this error happen
    pub fn stage(&self) -> Stage {
        match self {
            Error::InvalidConfig { .. } => Stage::Config,
            Error::Generation { .. } | Error::WorkerPool { .. } => Stage::Generation,
            Error::Sink { .. } | Error::UnexpectedBatch { .. } | Error::IncompleteRun { .. } => {
                Stage::Writing
            }
            Error::MetaDataFile { .. }
            | Error::OpenFile { .. }
            | Error::MapFile { .. }
            | Error::NoNewLineInBlock
            | Error::NotAFastqFile
            | Error::PartialRecord => Stage::Reading,
            Error::Check { .. } => Stage::Checking,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage() {
        assert_eq!(
            Error::InvalidConfig {
                reason: "max_length must be at least 1".to_string()
            }
            .stage(),
            Stage::Config
        );
        assert_eq!(
            Error::Generation {
                id: 3,
                tail_length: 12,
                max_length: 10
            }
            .stage(),
            Stage::Generation
        );
        assert_eq!(
            Error::Sink {
                batch_index: 2,
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full")
            }
            .stage(),
            Stage::Writing
        );
        assert_eq!(Error::PartialRecord.stage(), Stage::Reading);
    }

    #[test]
    fn message_name_index() {
        let error = Error::Sink {
            batch_index: 7,
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };

        assert_eq!(
            error.to_string(),
            "make_polyx can't write batch 7 in output disk full"
        );
    }
}
