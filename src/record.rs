//! Generate one poly-X record from a seed and an id.

/* std use */
use std::io::Write;

/* crate use */
use rand::Rng;
use rand::SeedableRng;

/* project use */
use crate::config::GenerationConfig;
use crate::error;

/// Nucleotide alphabet used for body and tail
pub const NUCLEOTIDES: [u8; 4] = *b"ACGT";

/// Quality of body bases
pub const HIGH_QUALITY: u8 = b'I';
/// Quality of the last body base
pub const LOW_TRANSITION: u8 = b'<';
/// Quality of the first tail base
pub const HIGH_TRANSITION: u8 = b'>';
/// Quality of tail bases
pub const LOW_QUALITY: u8 = b'9';

/// A read ended by a homopolymer tail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub id: u64,
    pub tail_length: usize,
    pub tail_base: u8,
    pub body: Vec<u8>,
    pub is_tail_only: bool,
}

impl SequenceRecord {
    /// Length of the body, bases before tail
    pub fn body_length(&self) -> usize {
        self.body.len()
    }

    /// Length of record, body and tail
    pub fn len(&self) -> usize {
        self.body.len() + self.tail_length
    }

    /// Return true if record contains no base, never true for a generated record
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Quality string of record, see [quality]
    pub fn quality(&self) -> Vec<u8> {
        quality(self.body.len(), self.tail_length)
    }

    /// Write record in fastq format
    pub fn write_fastq<W>(&self, out: &mut W) -> std::io::Result<()>
    where
        W: Write,
    {
        write!(
            out,
            "@seq_{} poly={} seqlen={}",
            self.id,
            self.tail_length,
            self.body.len()
        )?;
        if self.is_tail_only {
            out.write_all(b" onlytail=true")?;
        }
        out.write_all(b"\n")?;

        out.write_all(&self.body)?;
        out.write_all(&vec![self.tail_base; self.tail_length])?;
        out.write_all(b"\n+\n")?;

        out.write_all(&self.quality())?;
        out.write_all(b"\n")
    }
}

/// Build quality string of a record, the body/tail junction is mark by [LOW_TRANSITION] followed by [HIGH_TRANSITION]
///
/// Without body all positions get [LOW_QUALITY].
pub fn quality(body_length: usize, tail_length: usize) -> Vec<u8> {
    let mut quality = Vec::with_capacity(body_length + tail_length);

    if body_length == 0 {
        quality.resize(tail_length, LOW_QUALITY);
    } else {
        quality.resize(body_length - 1, HIGH_QUALITY);
        quality.push(LOW_TRANSITION);
        quality.push(HIGH_TRANSITION);
        quality.resize(body_length + tail_length, LOW_QUALITY);
    }

    quality
}

/// Seed of record random generator, depend only on global seed and record id
pub fn record_seed(seed: u64, id: u64) -> u64 {
    let mut z = seed ^ id.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Generate record `id`, if `is_last` record contains only a tail
///
/// Each call use its own random generator seeded by [record_seed], the same id with the same config produce the same record whatever thread call it.
pub fn generate(id: u64, config: &GenerationConfig, is_last: bool) -> error::Result<SequenceRecord> {
    if config.max_polytail < 1 || config.max_length < 1 {
        return Err(error::Error::InvalidConfig {
            reason: format!(
                "can't generate record with max_length {} and max_polytail {}",
                config.max_length, config.max_polytail
            ),
        });
    }

    let mut rng = rand::rngs::StdRng::seed_from_u64(record_seed(config.seed, id));

    let tail_length = rng.gen_range(1..=config.max_polytail);
    let tail_base = NUCLEOTIDES[rng.gen_range(0..NUCLEOTIDES.len())];

    if is_last {
        return Ok(SequenceRecord {
            id,
            tail_length,
            tail_base,
            body: Vec::new(),
            is_tail_only: true,
        });
    }

    if tail_length > config.max_length {
        return Err(error::Error::Generation {
            id,
            tail_length,
            max_length: config.max_length,
        });
    }

    let body_length = rng.gen_range(0..=config.max_length - tail_length);
    let body = (0..body_length)
        .map(|_| NUCLEOTIDES[rng.gen_range(0..NUCLEOTIDES.len())])
        .collect();

    Ok(SequenceRecord {
        id,
        tail_length,
        tail_base,
        body,
        is_tail_only: false,
    })
}
