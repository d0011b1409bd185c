//! SQLite variable-length integers.
//!
//! A varint is 1-9 bytes. Each of the first eight bytes carries 7 bits of the
//! value, most significant group first, with the high bit set when another
//! byte follows. A 9th byte, if reached, carries a full 8 bits.

use crate::sqlite::error::{read_fully, Result};
use std::io::Read;

const VARINT_MAX_BYTES: usize = 9;
const VARINT_CONTINUATION_BIT: u8 = 0x80;
const VARINT_DATA_MASK: u8 = 0x7f;

/// Largest value that fits in the 8-byte (7 bits per byte) form
const MAX_SHORT_VARINT: u64 = 0x00ff_ffff_ffff_ffff;

/// Utility trait for pulling varints off any byte source
pub trait Varint: Read {
    /// Reads a varint, returning `(value, bytes_consumed)`
    fn read_varint(&mut self) -> Result<(u64, usize)> {
        let mut value = 0u64;
        let mut byte = [0u8; 1];

        for i in 0..VARINT_MAX_BYTES - 1 {
            read_fully(self, &mut byte, "varint")?;
            value = (value << 7) | (byte[0] & VARINT_DATA_MASK) as u64;
            if byte[0] & VARINT_CONTINUATION_BIT == 0 {
                return Ok((value, i + 1));
            }
        }

        // The ninth byte contributes all 8 bits
        read_fully(self, &mut byte, "varint")?;
        Ok(((value << 8) | byte[0] as u64, VARINT_MAX_BYTES))
    }
}

impl<R: Read + ?Sized> Varint for R {}

/// Encodes `value` in its canonical (shortest) varint form
pub fn encode_varint(value: u64) -> Vec<u8> {
    if value > MAX_SHORT_VARINT {
        let mut buf = vec![0u8; VARINT_MAX_BYTES];
        buf[VARINT_MAX_BYTES - 1] = value as u8;
        let mut rest = value >> 8;
        for slot in buf[..VARINT_MAX_BYTES - 1].iter_mut().rev() {
            *slot = (rest as u8 & VARINT_DATA_MASK) | VARINT_CONTINUATION_BIT;
            rest >>= 7;
        }
        return buf;
    }

    let mut groups = Vec::with_capacity(VARINT_MAX_BYTES - 1);
    let mut rest = value;
    loop {
        groups.push(rest as u8 & VARINT_DATA_MASK);
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    groups.reverse();

    let last = groups.len() - 1;
    for group in &mut groups[..last] {
        *group |= VARINT_CONTINUATION_BIT;
    }
    groups
}
