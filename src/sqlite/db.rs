//! SQLite File Format Implementation
//!
//! # SQLite File Structure
//!
//! A SQLite database file consists of one or more pages. The first page (page 1) contains:
//!
//! - Database header (100 bytes)
//! - The root page of the sqlite_master table, whose cell offsets are
//!   measured from the start of the file
//!
//! Only that single root leaf page is read. Interior pages, overflow pages
//! and every other b-tree are out of reach, so both queries describe small
//! databases whose schema fits in page 1.

use crate::sqlite::btree::{CellPointerArray, PageHeader};
use crate::sqlite::core::header::FileHeader;
use crate::sqlite::core::record::Record;
use crate::sqlite::core::schema::TableEntry;
use crate::sqlite::core::varint::Varint;
use crate::sqlite::error::{read_fully, DecodeError, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, info, warn};

/// Represents a SQLite database file
pub struct SQLiteDatabase<R> {
    /// The underlying byte source
    source: R,
}

/// Contains metadata about a SQLite database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SQLiteDatabaseInfo {
    /// Size of each page in bytes
    page_size: u32,
    /// Cell count of the root page
    num_tables: u16,
}

impl SQLiteDatabaseInfo {
    /// Returns the page size in bytes
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the number of cells on the sqlite_master root page.
    ///
    /// Indexes, views and triggers are counted too, and a schema spilling
    /// past page 1 is undercounted.
    pub fn num_tables(&self) -> u16 {
        self.num_tables
    }
}

impl SQLiteDatabase<BufReader<File>> {
    /// Opens a SQLite database file at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DecodeError::IoFailure {
            context: "database file",
            source,
        })?;
        debug!("Opened database file {}", path.display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read + Seek> SQLiteDatabase<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Summary query: page size and root page cell count
    pub fn get_info(&mut self) -> Result<SQLiteDatabaseInfo> {
        self.seek(0)?;
        let header = FileHeader::read(&mut self.source)?;
        let page_size = header.page_size;
        info!("Read page size from header: {}", page_size);

        let body_len = (page_size as usize)
            .checked_sub(FileHeader::HEADER_SIZE)
            .filter(|&len| len >= PageHeader::SIZE)
            .ok_or(DecodeError::InvalidPageSize(page_size))?;

        let mut root_page = vec![0u8; body_len];
        read_fully(&mut self.source, &mut root_page, "root page")?;
        let page_header = PageHeader::parse(&root_page)?;

        info!(
            "Root page holds {} cells; reporting them as the table count",
            page_header.num_cells
        );

        Ok(SQLiteDatabaseInfo {
            page_size,
            num_tables: page_header.num_cells,
        })
    }

    /// Every sqlite_master row on the root page, in cell pointer order
    pub fn schema_entries(&mut self) -> Result<Vec<TableEntry>> {
        self.seek(0)?;
        let header = FileHeader::read(&mut self.source)?;
        if !header.is_utf8() && header.text_encoding != 0 {
            warn!(
                "Text encoding {} is not UTF-8; names are decoded as UTF-8 anyway",
                header.text_encoding
            );
        }

        let page_header = PageHeader::read(&mut self.source)?;
        let cell_pointers = CellPointerArray::read(&mut self.source, page_header.num_cells)?;
        if cell_pointers.is_empty() {
            info!("Schema root page holds no cells");
        }

        let mut entries = Vec::with_capacity(cell_pointers.len());
        for ptr in cell_pointers.iter() {
            // Page 1 starts at file offset 0
            self.seek(ptr as u64)?;

            let (payload_length, _) = self.source.read_varint()?;
            let (rowid, _) = self.source.read_varint()?;
            debug!(
                "Cell at {} - payload_length: {}, rowid: {}",
                ptr, payload_length, rowid
            );

            let columns = Record::decode(&mut self.source, TableEntry::NUM_COLUMNS)?;
            let entry = TableEntry::from_columns(columns)?;
            debug!("Schema entry: {} {}", entry.object_type, entry.name);
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Table-list query: user table names in cell pointer order
    pub fn list_tables(&mut self) -> Result<Vec<String>> {
        let tables: Vec<String> = self
            .schema_entries()?
            .into_iter()
            .filter(TableEntry::is_user_table)
            .map(|entry| entry.name)
            .collect();

        info!("Found {} user tables", tables.len());
        Ok(tables)
    }

    fn seek(&mut self, offset: u64) -> Result<()> {
        self.source
            .seek(SeekFrom::Start(offset))
            .map_err(|e| DecodeError::io("database file", e))?;
        Ok(())
    }
}
