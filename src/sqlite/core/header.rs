//! SQLite Database Header Implementation
//!
//! Handles parsing of the SQLite database header (first 100 bytes of the file).
//!
//! ## Database Header Format (fields decoded here)
//!
//! - Bytes 0-15: Header string "SQLite format 3\0"
//! - Bytes 16-17: Page size in bytes (big-endian, 1 means 65536)
//! - Byte 18: File format write version
//! - Byte 19: File format read version
//! - Byte 20: Reserved space at end of each page
//! - Bytes 28-31: Size of database file in pages
//! - Bytes 56-59: Database text encoding (1:UTF-8, 2:UTF-16le, 3:UTF-16be)

use crate::sqlite::error::{read_fully, DecodeError, Result};
use nom::bytes::complete::take;
use nom::number::complete::{be_u16, be_u32, u8 as be_u8};
use nom::sequence::tuple;
use nom::IResult;
use std::io::Read;
use tracing::{debug, warn};

/// The decoded file header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// Whether bytes 0-15 hold the expected magic string
    pub has_magic: bool,
    /// Page size in bytes, with the on-disk value 1 already widened to 65536
    pub page_size: u32,
    /// File format write version (byte 18)
    pub write_version: u8,
    /// File format read version (byte 19)
    pub read_version: u8,
    /// Reserved space at end of each page (byte 20)
    pub reserved_space: u8,
    /// Size of database file in pages (bytes 28-31)
    pub database_size: u32,
    /// Database text encoding (bytes 56-59)
    pub text_encoding: u32,
}

impl FileHeader {
    /// Size of the SQLite database header in bytes
    pub const HEADER_SIZE: usize = 100;

    /// Magic string that should appear at the start of every SQLite file
    const MAGIC_STRING: &'static [u8] = b"SQLite format 3\0";

    /// Reads exactly [`Self::HEADER_SIZE`] bytes from `reader` and decodes them
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; Self::HEADER_SIZE];
        read_fully(reader, &mut bytes, "database file header")?;
        Self::parse(&bytes)
    }

    /// Parses a database header from raw bytes
    pub fn parse(header_bytes: &[u8]) -> Result<Self> {
        let (_, header) = parse_header(header_bytes)
            .map_err(|_| DecodeError::UnexpectedEof("database file header"))?;

        if !header.has_magic {
            warn!("File does not start with the SQLite magic string");
        }
        debug!("Parsed database header: {:?}", header);
        Ok(header)
    }

    pub fn is_utf8(&self) -> bool {
        self.text_encoding == 1
    }
}

fn parse_header(input: &[u8]) -> IResult<&[u8], FileHeader> {
    let (input, magic) = take(16usize)(input)?;
    let (input, (raw_page_size, write_version, read_version, reserved_space)) =
        tuple((be_u16, be_u8, be_u8, be_u8))(input)?;
    // Bytes 21-27: payload fractions and change counter
    let (input, _) = take(7usize)(input)?;
    let (input, database_size) = be_u32(input)?;
    // Bytes 32-55: freelist, schema cookie and friends
    let (input, _) = take(24usize)(input)?;
    let (input, text_encoding) = be_u32(input)?;
    let (input, _) = take(40usize)(input)?;

    let page_size = match raw_page_size {
        1 => 65_536,
        n => n as u32,
    };

    Ok((
        input,
        FileHeader {
            has_magic: magic == FileHeader::MAGIC_STRING,
            page_size,
            write_version,
            read_version,
            reserved_space,
            database_size,
            text_encoding,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(page_size: u16) -> Vec<u8> {
        let mut bytes = vec![0u8; FileHeader::HEADER_SIZE];
        bytes[..16].copy_from_slice(FileHeader::MAGIC_STRING);
        bytes[16..18].copy_from_slice(&page_size.to_be_bytes());
        bytes[18] = 1;
        bytes[19] = 1;
        bytes[28..32].copy_from_slice(&2u32.to_be_bytes());
        bytes[56..60].copy_from_slice(&1u32.to_be_bytes());
        bytes
    }

    #[test]
    fn test_parse_page_size() -> Result<()> {
        let header = FileHeader::parse(&header_bytes(4096))?;
        assert!(header.has_magic);
        assert_eq!(header.page_size, 4096);
        assert_eq!(header.write_version, 1);
        assert_eq!(header.read_version, 1);
        assert_eq!(header.database_size, 2);
        assert!(header.is_utf8());
        Ok(())
    }

    #[test]
    fn test_page_size_one_means_64k() -> Result<()> {
        let header = FileHeader::parse(&header_bytes(1))?;
        assert_eq!(header.page_size, 65_536);
        Ok(())
    }

    #[test]
    fn test_missing_magic_is_tolerated() -> Result<()> {
        let mut bytes = header_bytes(512);
        bytes[..16].fill(0);
        let header = FileHeader::parse(&bytes)?;
        assert!(!header.has_magic);
        assert_eq!(header.page_size, 512);
        Ok(())
    }

    #[test]
    fn test_short_header() {
        let bytes = header_bytes(4096);
        let mut src = &bytes[..60];
        assert!(matches!(
            FileHeader::read(&mut src),
            Err(DecodeError::UnexpectedEof("database file header"))
        ));
        assert!(matches!(
            FileHeader::parse(&bytes[..99]),
            Err(DecodeError::UnexpectedEof(_))
        ));
    }
}
