//! SQLite Record Format Implementation
//!
//! This module decodes the body of a table-leaf cell into column values.
//!
//! ## Record Format
//!
//! - Header size (varint), counting its own bytes
//! - Serial type codes, one varint per column
//! - The column values, concatenated in column order
//!
//! The serial type codes in the header describe the data type and size of each field:
//!
//! - 0: NULL
//! - 1-6: 8/16/24/32/48/64-bit signed int
//! - 7: IEEE 754 64-bit float
//! - 8, 9: the constants 0 and 1
//! - 10, 11: internal use
//! - N >= 12, even: BLOB of (N-12)/2 bytes
//! - N >= 13, odd: Text of (N-13)/2 bytes
//!
//! Only text and blob columns are decoded. Types 0-11 come back as
//! [`ColumnValue::Empty`], though their on-disk width is still skipped.

use super::varint::Varint;
use crate::sqlite::error::{read_declared, DecodeError, Result};
use std::borrow::Cow;
use std::io::{self, Read};
use tracing::debug;

/// Raw bytes of a single column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue {
    /// NULL, or a numeric storage class this decoder does not interpret
    Empty,
    /// Text or blob payload exactly as stored
    Bytes(Vec<u8>),
}

impl ColumnValue {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ColumnValue::Empty => &[],
            ColumnValue::Bytes(bytes) => bytes,
        }
    }

    /// Text view of the column, replacing invalid UTF-8
    pub fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

/// Decoded serial type code for one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialType(pub u64);

impl SerialType {
    /// Whether the column holds a text or blob payload
    pub fn is_text_or_blob(self) -> bool {
        self.0 >= 12
    }

    /// Number of body bytes the column occupies.
    ///
    /// Numeric types 1-7 report their real width so they can be skipped, and
    /// even types size blobs as `(N-12)/2`; both differ from treating every
    /// type below 13 as zero-length.
    pub fn content_size(self) -> u64 {
        match self.0 {
            0 | 8..=11 => 0,
            1 => 1,
            2 => 2,
            3 => 3,
            4 => 4,
            5 => 6,
            6 | 7 => 8,
            n if n % 2 == 0 => (n - 12) / 2,
            n => (n - 13) / 2,
        }
    }
}

/// Decoder for record bodies
pub struct Record;

impl Record {
    /// Decodes the first `num_columns` columns of the record body at the
    /// current position of `reader`.
    ///
    /// Leaves `reader` just past the last decoded column value.
    pub fn decode<R: Read + ?Sized>(reader: &mut R, num_columns: usize) -> Result<Vec<ColumnValue>> {
        let serial_types = Self::read_header(reader)?;
        debug!("Record serial types: {:?}", serial_types);

        if num_columns > serial_types.len() {
            return Err(DecodeError::ColumnIndexOutOfRange {
                requested: num_columns,
                declared: serial_types.len(),
            });
        }

        serial_types
            .iter()
            .take(num_columns)
            .map(|&serial_type| Self::read_column(reader, serial_type))
            .collect()
    }

    /// Reads the header size varint and the serial types that follow it
    pub fn read_header<R: Read + ?Sized>(reader: &mut R) -> Result<Vec<SerialType>> {
        let (header_size, size_len) = reader
            .read_varint()
            .map_err(DecodeError::into_truncated)?;

        let header_len = header_size
            .checked_sub(size_len as u64)
            .ok_or(DecodeError::TruncatedRecord("record header"))?;

        let header = read_declared(reader, header_len, "record header")?;

        let mut serial_types = Vec::with_capacity(header.len());
        let mut types = header.as_slice();
        while !types.is_empty() {
            let (code, _) = types
                .read_varint()
                .map_err(|_| DecodeError::TruncatedRecord("serial type"))?;
            serial_types.push(SerialType(code));
        }

        Ok(serial_types)
    }

    fn read_column<R: Read + ?Sized>(reader: &mut R, serial_type: SerialType) -> Result<ColumnValue> {
        let size = serial_type.content_size();

        if !serial_type.is_text_or_blob() {
            let skipped = io::copy(&mut (&mut *reader).take(size), &mut io::sink())
                .map_err(|e| DecodeError::io("column value", e))?;
            if skipped != size {
                return Err(DecodeError::TruncatedRecord("column value"));
            }
            return Ok(ColumnValue::Empty);
        }

        let value = read_declared(reader, size, "column value")?;
        Ok(ColumnValue::Bytes(value))
    }
}
