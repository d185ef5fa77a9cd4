//! Verify a fixture file, each record should match ground truth store in its header.

/* project use */
use crate::error;
use crate::fastq;
use crate::fastq::parser::Sequential;
use crate::record;

/// Summary of a valid fixture
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub records: u64,
    pub bases: u64,
    pub tail_only_id: Option<u64>,
    pub longest_tail: usize,
    pub longest_record: usize,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "records\t{}", self.records)?;
        writeln!(f, "bases\t{}", self.bases)?;
        match self.tail_only_id {
            Some(id) => writeln!(f, "tail_only_id\t{}", id)?,
            None => writeln!(f, "tail_only_id\tNA")?,
        }
        writeln!(f, "longest_tail\t{}", self.longest_tail)?;
        write!(f, "longest_record\t{}", self.longest_record)
    }
}

/// Check records one by one, record must be in id order and only the last one contains only a tail
#[derive(Debug, Default)]
pub struct Checker {
    max_length: Option<usize>,
    max_polytail: Option<usize>,
    report: Report,
}

impl Checker {
    /// Create a checker, records longer than `max_length` or tails longer than `max_polytail` are rejected
    pub fn new(max_length: Option<usize>, max_polytail: Option<usize>) -> Self {
        Self {
            max_length,
            max_polytail,
            report: Report::default(),
        }
    }

    /// Check fixture store in path
    pub fn check<P>(self, path: P) -> error::Result<Report>
    where
        P: AsRef<std::path::Path>,
    {
        self.check_with_blocksize(crate::DEFAULT_BLOCKSIZE, path)
    }

    /// Check fixture store in path with selected blocksize, blocksize must be larger than two records
    pub fn check_with_blocksize<P>(mut self, blocksize: u64, path: P) -> error::Result<Report>
    where
        P: AsRef<std::path::Path>,
    {
        log::info!("Start check {}", path.as_ref().display());
        self.with_blocksize(blocksize, path)?;
        let report = self.finish()?;
        log::info!("End check {} records", report.records);

        Ok(report)
    }

    /// Check file contains at least one record and end by the tail only record
    pub fn finish(self) -> error::Result<Report> {
        if self.report.records == 0 {
            return Err(invalid(0, "file contains no record"));
        }

        let last_id = self.report.records - 1;
        if self.report.tail_only_id != Some(last_id) {
            return Err(invalid(last_id, "last record isn't a tail only record"));
        }

        Ok(self.report)
    }

    fn check_record(&self, record: &fastq::Record) -> error::Result<fastq::Header> {
        let expected_id = self.report.records;

        let header = fastq::Header::parse(record.comment)
            .ok_or_else(|| invalid(expected_id, "malformed header"))?;

        if header.id != expected_id {
            return Err(invalid(
                expected_id,
                format!("found record {} expect id {}", header.id, expected_id),
            ));
        }

        if let Some(tail_only_id) = self.report.tail_only_id {
            return Err(invalid(
                header.id,
                format!("record after tail only record {}", tail_only_id),
            ));
        }

        if header.tail_length < 1 {
            return Err(invalid(header.id, "tail is empty"));
        }

        if header.tail_only && header.body_length != 0 {
            return Err(invalid(header.id, "tail only record with a body"));
        }

        let length = header
            .body_length
            .checked_add(header.tail_length)
            .ok_or_else(|| invalid(header.id, "seqlen + poly overflow"))?;
        if record.sequence.len() != length {
            return Err(invalid(
                header.id,
                format!(
                    "sequence length {} expect seqlen + poly = {}",
                    record.sequence.len(),
                    length
                ),
            ));
        }

        if record.plus != b"+" {
            return Err(invalid(header.id, "separator line isn't '+'"));
        }

        if record.quality.len() != length {
            return Err(invalid(
                header.id,
                format!(
                    "quality length {} expect {}",
                    record.quality.len(),
                    length
                ),
            ));
        }

        let (body, tail) = record.sequence.split_at(header.tail_start());
        if !body.iter().all(|nuc| record::NUCLEOTIDES.contains(nuc)) {
            return Err(invalid(header.id, "body contains a non ACGT base"));
        }

        let tail_base = tail[0];
        if !record::NUCLEOTIDES.contains(&tail_base) || tail.iter().any(|nuc| *nuc != tail_base) {
            return Err(invalid(header.id, "tail isn't a homopolymer of A, C, G or T"));
        }

        if record.quality != record::quality(header.body_length, header.tail_length).as_slice() {
            return Err(invalid(header.id, "quality doesn't mark body/tail junction"));
        }

        if let Some(max_polytail) = self.max_polytail {
            if header.tail_length > max_polytail {
                return Err(invalid(
                    header.id,
                    format!("tail length {} exceed {}", header.tail_length, max_polytail),
                ));
            }
        }

        if let Some(max_length) = self.max_length {
            if length > max_length {
                return Err(invalid(
                    header.id,
                    format!("record length {} exceed {}", length, max_length),
                ));
            }
        }

        Ok(header)
    }
}

impl Sequential for Checker {
    fn record(&mut self, record: fastq::Record) -> error::Result<()> {
        let header = self.check_record(&record)?;

        self.report.records += 1;
        self.report.bases += record.sequence.len() as u64;
        self.report.longest_tail = self.report.longest_tail.max(header.tail_length);
        self.report.longest_record = self.report.longest_record.max(record.sequence.len());
        if header.tail_only {
            self.report.tail_only_id = Some(header.id);
        }

        Ok(())
    }
}

fn invalid<S>(id: u64, reason: S) -> error::Error
where
    S: Into<String>,
{
    error::Error::Check {
        id,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    fn fixture(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();

        file
    }

    fn check_error(content: &str) -> (u64, String) {
        match Checker::new(Some(10), Some(3)).check(fixture(content).path()) {
            Err(error::Error::Check { id, reason }) => (id, reason),
            other => panic!("expect a check error get {:?}", other),
        }
    }

    #[test]
    fn generated_fixture() {
        let file = crate::tests::generate_fixture(42, 2_000, 150, 30);

        let report = Checker::new(Some(150), Some(30))
            .check_with_blocksize(4_096, file.path())
            .unwrap();

        assert_eq!(report.records, 2_000);
        assert_eq!(report.tail_only_id, Some(1_999));
        assert!(report.longest_tail <= 30);
        assert!(report.longest_record <= 150);
        assert_eq!(
            report.bases,
            std::fs::read(file.path())
                .unwrap()
                .split(|c| *c == b'\n')
                .skip(1)
                .step_by(4)
                .map(|seq| seq.len() as u64)
                .sum::<u64>()
        );
    }

    #[test]
    fn default_blocksize() {
        assert_eq!(crate::DEFAULT_BLOCKSIZE, 8_192);

        let file = crate::tests::generate_fixture(7, 500, 1_000, 100);
        let report = Checker::new(Some(1_000), Some(100)).check(file.path()).unwrap();

        assert_eq!(report.records, 500);
    }

    #[test]
    fn minimal() {
        let report = Checker::default()
            .check(fixture("@seq_0 poly=2 seqlen=3\nACGTT\n+\nII<>9\n@seq_1 poly=1 seqlen=0 onlytail=true\nG\n+\n9\n").path())
            .unwrap();

        assert_eq!(
            report,
            Report {
                records: 2,
                bases: 6,
                tail_only_id: Some(1),
                longest_tail: 2,
                longest_record: 5,
            }
        );
    }

    #[test]
    fn empty() {
        assert_eq!(check_error("").0, 0);
    }

    #[test]
    fn missing_tail_only() {
        let (id, reason) = check_error("@seq_0 poly=2 seqlen=3\nACGTT\n+\nII<>9\n");

        assert_eq!(id, 0);
        assert_eq!(reason, "last record isn't a tail only record");
    }

    #[test]
    fn gap_in_id() {
        let (id, _) = check_error(
            "@seq_0 poly=2 seqlen=3\nACGTT\n+\nII<>9\n@seq_2 poly=1 seqlen=0 onlytail=true\nG\n+\n9\n",
        );

        assert_eq!(id, 1);
    }

    #[test]
    fn record_after_tail_only() {
        let (id, _) = check_error(
            "@seq_0 poly=1 seqlen=0 onlytail=true\nG\n+\n9\n@seq_1 poly=1 seqlen=0 onlytail=true\nG\n+\n9\n",
        );

        assert_eq!(id, 1);
    }

    #[test]
    fn bad_junction() {
        let (_, reason) = check_error(
            "@seq_0 poly=2 seqlen=3\nACGTT\n+\nIII99\n@seq_1 poly=1 seqlen=0 onlytail=true\nG\n+\n9\n",
        );

        assert_eq!(reason, "quality doesn't mark body/tail junction");
    }

    #[test]
    fn not_homopolymer() {
        let (_, reason) = check_error(
            "@seq_0 poly=2 seqlen=3\nACGTA\n+\nII<>9\n@seq_1 poly=1 seqlen=0 onlytail=true\nG\n+\n9\n",
        );

        assert_eq!(reason, "tail isn't a homopolymer of A, C, G or T");
    }

    #[test]
    fn length_mismatch() {
        let (_, reason) = check_error(
            "@seq_0 poly=2 seqlen=4\nACGTT\n+\nII<>9\n@seq_1 poly=1 seqlen=0 onlytail=true\nG\n+\n9\n",
        );

        assert_eq!(reason, "sequence length 5 expect seqlen + poly = 6");
    }

    #[test]
    fn length_overflow() {
        let (id, reason) = check_error("@seq_0 poly=18446744073709551615 seqlen=1\n\n+\n\n");

        assert_eq!(id, 0);
        assert_eq!(reason, "seqlen + poly overflow");
    }

    #[test]
    fn limits() {
        let (_, reason) = check_error(
            "@seq_0 poly=4 seqlen=1\nAGGGG\n+\n<>999\n@seq_1 poly=1 seqlen=0 onlytail=true\nG\n+\n9\n",
        );
        assert_eq!(reason, "tail length 4 exceed 3");

        let (_, reason) = check_error(
            "@seq_0 poly=2 seqlen=9\nACGTACGTAGG\n+\nIIIIIIII<>9\n@seq_1 poly=1 seqlen=0 onlytail=true\nG\n+\n9\n",
        );
        assert_eq!(reason, "record length 11 exceed 10");
    }
}
