//! Error taxonomy for the on-disk decoders.
//!
//! Every decode step either consumes exactly the bytes it asked for or fails
//! with one of these variants. Nothing is recovered locally; the error travels
//! up to the dispatcher, which aborts the query.

use std::io::{self, Read};
use thiserror::Error;

/// Errors raised while decoding a database file
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file could not be opened or a read failed for a reason other than EOF
    #[error("I/O failure while reading {context}")]
    IoFailure {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    /// A fixed-width field or varint ran past the end of the source
    #[error("unexpected end of file while reading {0}")]
    UnexpectedEof(&'static str),

    /// A record body declared more header or value bytes than are available
    #[error("truncated record: not enough bytes for {0}")]
    TruncatedRecord(&'static str),

    /// The caller asked for more columns than the record header declares
    #[error("requested {requested} columns but record declares only {declared}")]
    ColumnIndexOutOfRange { requested: usize, declared: usize },

    /// The page size in the file header cannot hold the root page header
    #[error("invalid page size {0}")]
    InvalidPageSize(u32),
}

impl DecodeError {
    pub fn io(context: &'static str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::UnexpectedEof {
            DecodeError::UnexpectedEof(context)
        } else {
            DecodeError::IoFailure { context, source }
        }
    }

    /// Re-labels an end-of-file as a truncated record; other errors pass through.
    pub fn into_truncated(self) -> Self {
        match self {
            DecodeError::UnexpectedEof(context) => DecodeError::TruncatedRecord(context),
            other => other,
        }
    }
}

pub type Result<T, E = DecodeError> = std::result::Result<T, E>;

/// Fills `buf` completely or fails. A short read is never accepted.
pub fn read_fully<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
    context: &'static str,
) -> Result<()> {
    reader
        .read_exact(buf)
        .map_err(|e| DecodeError::io(context, e))
}

/// Reads up to `len` bytes, growing the buffer only as bytes arrive.
///
/// Fails with `TruncatedRecord` when the source ends first, so a corrupt
/// length never turns into an allocation of that size.
pub fn read_declared<R: Read + ?Sized>(
    reader: &mut R,
    len: u64,
    context: &'static str,
) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    (&mut *reader)
        .take(len)
        .read_to_end(&mut buf)
        .map_err(|e| DecodeError::io(context, e).into_truncated())?;
    if buf.len() as u64 != len {
        return Err(DecodeError::TruncatedRecord(context));
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_read_is_eof() {
        let mut src: &[u8] = &[1, 2, 3];
        let mut buf = [0u8; 4];
        let err = read_fully(&mut src, &mut buf, "page header").unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedEof("page header")));
    }

    #[test]
    fn test_read_declared_huge_length() {
        let mut src: &[u8] = &[1, 2, 3];
        let err = read_declared(&mut src, u64::MAX, "column value").unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedRecord("column value")));
    }

    #[test]
    fn test_read_declared_exact() -> Result<()> {
        let mut src: &[u8] = &[1, 2, 3];
        assert_eq!(read_declared(&mut src, 2, "column value")?, vec![1, 2]);
        assert_eq!(src, &[3]);
        Ok(())
    }

    #[test]
    fn test_truncated_relabel() {
        let err = DecodeError::UnexpectedEof("column value").into_truncated();
        assert!(matches!(err, DecodeError::TruncatedRecord("column value")));

        let err = DecodeError::InvalidPageSize(7).into_truncated();
        assert!(matches!(err, DecodeError::InvalidPageSize(7)));
    }

    #[test]
    fn test_other_io_errors_are_io_failures() {
        let err = DecodeError::io(
            "database file",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, DecodeError::IoFailure { context: "database file", .. }));
    }
}
