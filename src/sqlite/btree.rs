use crate::sqlite::error::{read_fully, DecodeError, Result};
use nom::multi::count;
use nom::number::complete::{be_u16, u8 as be_u8};
use nom::sequence::tuple;
use nom::IResult;
use std::io::Read;
use tracing::{debug, warn};

/// Represents a B-tree page header
///
/// ## B-tree Page Header Format
///
/// - Byte 0: Page type
/// - Bytes 1-2: First freeblock offset
/// - Bytes 3-4: Number of cells
/// - Bytes 5-6: Cell content offset
/// - Byte 7: Number of fragmented free bytes
///
/// Interior pages carry four more bytes (the right-most pointer), which are
/// never read here: only leaf-table pages are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHeader {
    /// Page type (leaf table = 13)
    pub page_type: u8,
    /// Offset to first freeblock
    pub first_freeblock: u16,
    /// Number of cells in page
    pub num_cells: u16,
    /// Offset to cell content area
    pub content_offset: u16,
    /// Number of fragmented free bytes
    pub fragmented_free_bytes: u8,
}

impl PageHeader {
    pub const SIZE: usize = 8;
    pub const LEAF_TABLE: u8 = 0x0d;

    /// Reads exactly [`Self::SIZE`] bytes and decodes them
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; Self::SIZE];
        read_fully(reader, &mut bytes, "page header")?;
        Self::parse(&bytes)
    }

    /// Parse a B-tree page header from a byte slice
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (_, header) =
            parse_page_header(data).map_err(|_| DecodeError::UnexpectedEof("page header"))?;

        if header.page_type != Self::LEAF_TABLE {
            warn!(
                "Page type {:#04x} is not a leaf table page; only the cell count is used",
                header.page_type
            );
        }
        debug!("Parsed page header: {:?}", header);
        Ok(header)
    }
}

fn parse_page_header(input: &[u8]) -> IResult<&[u8], PageHeader> {
    let (input, (page_type, first_freeblock, num_cells, content_offset, fragmented_free_bytes)) =
        tuple((be_u8, be_u16, be_u16, be_u16, be_u8))(input)?;

    Ok((
        input,
        PageHeader {
            page_type,
            first_freeblock,
            num_cells,
            content_offset,
            fragmented_free_bytes,
        },
    ))
}

/// The array of big-endian cell offsets that follows a page header.
///
/// Offsets are relative to the start of the page and kept in storage order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellPointerArray(Vec<u16>);

impl CellPointerArray {
    /// Reads `num_cells` pointers from the current position of `reader`
    pub fn read<R: Read + ?Sized>(reader: &mut R, num_cells: u16) -> Result<Self> {
        let mut bytes = vec![0u8; num_cells as usize * 2];
        read_fully(reader, &mut bytes, "cell pointer array")?;

        let (_, pointers) = count(be_u16, num_cells as usize)(bytes.as_slice())
            .map_err(|_: nom::Err<nom::error::Error<&[u8]>>| {
                DecodeError::UnexpectedEof("cell pointer array")
            })?;

        debug!("Cell pointers: {:?}", pointers);
        Ok(Self(pointers))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }
}
