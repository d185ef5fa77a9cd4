/* crate use */
use bstr::ByteSlice;

/* project use */
use crate::error;

pub struct Producer {
    offset: u64,
    blocksize: u64,
    file: std::fs::File,
    file_length: u64,
}

impl Producer {
    pub fn new<P>(path: P) -> error::Result<Self>
    where
        P: AsRef<std::path::Path>,
    {
        Producer::with_blocksize(crate::DEFAULT_BLOCKSIZE, path)
    }

    pub fn with_blocksize<P>(mut blocksize: u64, path: P) -> error::Result<Self>
    where
        P: AsRef<std::path::Path>,
    {
        let file_length = path
            .as_ref()
            .metadata()
            .map_err(|source| error::Error::MetaDataFile { source })?
            .len();

        blocksize = file_length.min(blocksize);

        Ok(Producer {
            offset: 0,
            blocksize,
            file_length,
            file: std::fs::File::open(path).map_err(|source| error::Error::OpenFile { source })?,
        })
    }

    pub fn next_block(&mut self) -> error::Result<Option<crate::block::Block>> {
        if self.offset == self.file_length {
            Ok(None)
        } else if self.offset + self.blocksize >= self.file_length {
            let block = unsafe {
                memmap2::MmapOptions::new()
                    .offset(self.offset)
                    .len((self.file_length - self.offset) as usize)
                    .map(&self.file)
                    .map_err(|source| error::Error::MapFile { source })?
            };

            self.offset = self.file_length;

            Ok(Some(crate::block::Block::new(block.len(), block)))
        } else {
            let tmp = unsafe {
                memmap2::MmapOptions::new()
                    .offset(self.offset)
                    .len(self.blocksize as usize)
                    .map(&self.file)
                    .map_err(|source| error::Error::MapFile { source })?
            };

            let blocksize = Producer::correct_block_size(&tmp)?;
            self.offset += blocksize;

            Ok(Some(crate::block::Block::new(blocksize as usize, tmp)))
        }
    }

    /// Search the begin of the partial record at the end of block
    fn correct_block_size(block: &[u8]) -> error::Result<u64> {
        let mut end = block.len();
        let mut seen_plus = false;

        for _ in 0..8 {
            end = block[..end]
                .rfind_byte(b'\n')
                .ok_or(error::Error::NoNewLineInBlock)?;

            if end + 1 < block.len() {
                seen_plus = seen_plus || block[end + 1] == b'+';

                if seen_plus && block[end + 1] == b'@' {
                    return Ok((end + 1) as u64);
                }
            }
        }

        Err(error::Error::NotAFastqFile)
    }
}

impl Iterator for Producer {
    type Item = error::Result<crate::block::Block>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_block() {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

pub struct Reader {
    offset: usize,
    block: crate::block::Block,
}

impl Reader {
    pub fn new(block: crate::block::Block) -> Self {
        Reader { offset: 0, block }
    }

    fn get_line(&self) -> error::Result<std::ops::Range<usize>> {
        let next = memchr::memchr(b'\n', &self.block.data()[self.offset..])
            .ok_or(error::Error::PartialRecord)?;

        Ok(self.offset..self.offset + next)
    }

    pub fn next_record(&mut self) -> error::Result<Option<super::Record<'_>>> {
        if self.offset == self.block.len() {
            Ok(None)
        } else {
            let comment = self.get_line()?;
            self.offset = comment.end + 1;

            let sequence = self.get_line()?;
            self.offset = sequence.end + 1;

            let plus = self.get_line()?;
            self.offset = plus.end + 1;

            let quality = self.get_line()?;
            self.offset = quality.end + 1;

            let data = self.block.data();
            Ok(Some(super::Record {
                comment: &data[comment],
                sequence: &data[sequence],
                plus: &data[plus],
                quality: &data[quality],
            }))
        }
    }
}
