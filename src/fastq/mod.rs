//! Read back fastq fixtures and their ground truth header.

/* mod declaration */
pub mod block;
pub mod parser;

/* crate use */
use bstr::ByteSlice;

/// Record store a fastq record all field is public
pub struct Record<'a> {
    pub comment: &'a [u8],
    pub sequence: &'a [u8],
    pub plus: &'a [u8],
    pub quality: &'a [u8],
}

/// Ground truth store in record comment: `@seq_<id> poly=<tail_length> seqlen=<body_length>[ onlytail=true]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub id: u64,
    pub tail_length: usize,
    pub body_length: usize,
    pub tail_only: bool,
}

impl Header {
    /// Parse a record comment, return None if comment doesn't follow fixture header format
    pub fn parse(comment: &[u8]) -> Option<Self> {
        let mut fields = comment.strip_prefix(b"@seq_")?.split_str(" ");

        let id = number(fields.next()?)?;
        let tail_length = number(fields.next()?.strip_prefix(b"poly=")?)?;
        let body_length = number(fields.next()?.strip_prefix(b"seqlen=")?)?;

        let tail_only = match fields.next() {
            None => false,
            Some(b"onlytail=true") => true,
            Some(_) => return None,
        };

        if fields.next().is_some() {
            return None;
        }

        Some(Header {
            id,
            tail_length,
            body_length,
            tail_only,
        })
    }

    /// Offset of the first tail base in sequence
    pub fn tail_start(&self) -> usize {
        self.body_length
    }
}

fn number<T>(field: &[u8]) -> Option<T>
where
    T: std::str::FromStr,
{
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return None;
    }

    field.to_str().ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header() {
        assert_eq!(
            Header::parse(b"@seq_12 poly=4 seqlen=120"),
            Some(Header {
                id: 12,
                tail_length: 4,
                body_length: 120,
                tail_only: false
            })
        );

        let last = Header::parse(b"@seq_999 poly=7 seqlen=0 onlytail=true").unwrap();
        assert!(last.tail_only);
        assert_eq!(last.tail_start(), 0);
    }

    #[test]
    fn bad_header() {
        let comments: [&[u8]; 8] = [
            b"@0",
            b"@seq_ poly=4 seqlen=120",
            b"@seq_1 poly=4",
            b"@seq_1 seqlen=4 poly=2",
            b"@seq_1 poly=-4 seqlen=2",
            b"@seq_1 poly=4 seqlen=2 onlytail=false",
            b"@seq_1 poly=4 seqlen=2 onlytail=true extra",
            b"@seq_1  poly=4 seqlen=2",
        ];

        for comment in comments {
            assert_eq!(Header::parse(comment), None);
        }
    }
}
