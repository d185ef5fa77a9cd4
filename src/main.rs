/* std use */
use std::io::Write;

/* crate use */
use anyhow::{Context, Result};
use clap::Parser;

/* project use */
use make_polyx::check;
use make_polyx::GenerationConfig;

#[derive(clap::Parser, Debug)]
#[clap(
    name = "make_polyx",
    version,
    about = "Generate fastq files of random sequences ended by a poly tail, the last sequence is a poly tail only"
)]
struct Command {
    #[clap(subcommand)]
    pub subcommand: SubCommand,

    #[clap(
        short = 'v',
        long = "verbosity",
        parse(from_occurrences),
        help = "verbosity level also control by environment variable MAKE_POLYX_LOG if flag is set MAKE_POLYX_LOG value is ignored"
    )]
    pub verbosity: u8,

    #[clap(short = 'q', long = "quiet", help = "only error are print")]
    pub quiet: bool,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Generate a fixture, output is gzipped if it ends with .gz
    Generate(Generate),
    /// Check a fixture, input must be uncompressed
    Check(Check),
}

#[derive(clap::Args, Debug)]
struct Generate {
    #[clap(short = 'o', long = "output", help = "Output file (gzipped if ending in .gz)")]
    pub output: std::path::PathBuf,

    #[clap(short = 'm', long = "max-length", default_value_t = make_polyx::DEFAULT_MAX_LENGTH, help = "Max length of the sequence")]
    pub max_length: usize,

    #[clap(short = 'p', long = "max-polytail", default_value_t = make_polyx::DEFAULT_MAX_POLYTAIL, help = "Max length of the poly tail")]
    pub max_polytail: usize,

    #[clap(short = 'n', long = "num-sequences", default_value_t = make_polyx::DEFAULT_NUM_SEQUENCES, help = "Number of sequences to generate")]
    pub num_sequences: u64,

    #[clap(short = 's', long = "seed", default_value_t = 0, help = "Random seed for reproducibility")]
    pub seed: u64,

    #[clap(short = 't', long = "threads", help = "Number of threads to use [default: number of CPU cores]")]
    pub threads: Option<usize>,

    #[clap(short = 'b', long = "batch-size", default_value_t = make_polyx::DEFAULT_BATCH_SIZE, help = "Batch size for sequence generation")]
    pub batch_size: u64,

    #[clap(short = 'l', long = "compression-level", default_value_t = 6, help = "Gzip compression level, between 1 and 9")]
    pub level: u32,
}

impl Generate {
    fn config(&self) -> GenerationConfig {
        GenerationConfig {
            max_length: self.max_length,
            max_polytail: self.max_polytail,
            num_sequences: self.num_sequences,
            seed: self.seed,
            worker_count: self.threads.unwrap_or_else(num_cpus::get),
            batch_size: self.batch_size,
        }
    }

    fn is_gzip(&self) -> bool {
        matches!(
            self.output.extension().and_then(std::ffi::OsStr::to_str),
            Some(ext) if ext.eq_ignore_ascii_case("gz")
        )
    }
}

#[derive(clap::Args, Debug)]
struct Check {
    #[clap(short = 'i', long = "input", help = "Fixture to check")]
    pub input: std::path::PathBuf,

    #[clap(short = 'm', long = "max-length", help = "Max length of the sequence")]
    pub max_length: Option<usize>,

    #[clap(short = 'p', long = "max-polytail", help = "Max length of the poly tail")]
    pub max_polytail: Option<usize>,

    #[clap(short = 'B', long = "blocksize", default_value_t = make_polyx::DEFAULT_BLOCKSIZE, help = "Size of block read, must be larger than two records")]
    pub blocksize: u64,
}

fn main() -> Result<()> {
    let params = Command::parse();

    init_logger(params.quiet, params.verbosity)?;

    match params.subcommand {
        SubCommand::Generate(generate) => run_generate(generate),
        SubCommand::Check(check) => run_check(check),
    }
}

fn init_logger(quiet: bool, verbosity: u8) -> Result<()> {
    if quiet {
        env_logger::Builder::from_env("MAKE_POLYX_LOG")
            .filter_level(log::LevelFilter::Error)
            .try_init()
            .with_context(|| "Init logger")?;
    } else if verbosity > 0 {
        let level = match verbosity {
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_env("MAKE_POLYX_LOG")
            .filter_level(level)
            .try_init()
            .with_context(|| "Init logger")?;
    } else {
        env_logger::Builder::from_env(
            env_logger::Env::new().filter_or("MAKE_POLYX_LOG", "info"),
        )
        .try_init()
        .with_context(|| "Init logger")?;
    }

    Ok(())
}

fn run_generate(params: Generate) -> Result<()> {
    let config = params.config();
    config.validate().with_context(|| "Check parameters")?;
    anyhow::ensure!(
        (1..=9).contains(&params.level),
        "Compression level must be between 1 and 9"
    );

    let output = std::fs::File::create(&params.output)
        .with_context(|| format!("Open output file {}", params.output.display()))?;
    let output = std::io::BufWriter::new(output);

    let mut output = write_fixture(&config, output, params.is_gzip().then(|| params.level))?;
    output
        .flush()
        .with_context(|| format!("Close output file {}", params.output.display()))?;

    log::info!(
        "Successfully generated {} sequences with max length {} and max polytail {} in {}",
        config.num_sequences,
        config.max_length,
        config.max_polytail,
        params.output.display()
    );

    Ok(())
}

fn run_check(params: Check) -> Result<()> {
    let report = check::Checker::new(params.max_length, params.max_polytail)
        .check_with_blocksize(params.blocksize, &params.input)
        .with_context(|| format!("Check fixture {}", params.input.display()))?;

    println!("{}", report);

    Ok(())
}

/// Write fixture in output, gzip stream is finish before output is return
fn write_fixture<W>(config: &GenerationConfig, output: W, gzip_level: Option<u32>) -> Result<W>
where
    W: Write,
{
    match gzip_level {
        Some(level) => {
            let encoder = flate2::write::GzEncoder::new(output, flate2::Compression::new(level));

            make_polyx::generate(config, encoder)
                .with_context(|| "Generate fixture")?
                .finish()
                .with_context(|| "Finish gzip stream")
        }
        None => make_polyx::generate(config, output).with_context(|| "Generate fixture"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Read;

    fn config() -> GenerationConfig {
        GenerationConfig {
            max_length: 50,
            max_polytail: 10,
            num_sequences: 200,
            seed: 42,
            worker_count: 2,
            batch_size: 16,
        }
    }

    struct Limited {
        data: Vec<u8>,
        capacity: usize,
    }

    impl Write for Limited {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.data.len() + buf.len() > self.capacity {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "no space left on device",
                ));
            }
            self.data.extend_from_slice(buf);

            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn gzip_stream_is_complete() {
        let plain = write_fixture(&config(), Vec::new(), None).unwrap();
        let gzip = write_fixture(&config(), Vec::new(), Some(6)).unwrap();

        let mut decoded = Vec::new();
        flate2::read::GzDecoder::new(gzip.as_slice())
            .read_to_end(&mut decoded)
            .unwrap();

        assert_eq!(decoded, plain);
    }

    #[test]
    fn gzip_trailer_failure() {
        let length = write_fixture(&config(), Vec::new(), Some(6)).unwrap().len();

        let sink = Limited {
            data: Vec::new(),
            capacity: length - 8,
        };

        assert!(write_fixture(&config(), sink, Some(6)).is_err());
    }

    #[test]
    fn gzip_extension() {
        let generate = |output: &str| Generate {
            output: output.into(),
            max_length: 10,
            max_polytail: 3,
            num_sequences: 2,
            seed: 0,
            threads: None,
            batch_size: 10,
            level: 6,
        };

        assert!(generate("fixture.fastq.gz").is_gzip());
        assert!(generate("fixture.fastq.GZ").is_gzip());
        assert!(!generate("fixture.fastq").is_gzip());
    }
}
