use super::record::ColumnValue;
use crate::sqlite::error::{DecodeError, Result};

/// One row of the sqlite_master table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// "table", "index", "view" or "trigger"
    pub object_type: String,
    pub name: String,
    pub tbl_name: String,
    /// Left raw: the integer storage class is not decoded
    pub root_page: ColumnValue,
    pub sql: String,
}

impl TableEntry {
    /// sqlite_master has 5 columns: type, name, tbl_name, rootpage, sql
    pub const NUM_COLUMNS: usize = 5;

    /// Bookkeeping table SQLite creates for AUTOINCREMENT columns
    pub const SEQUENCE_TABLE: &'static str = "sqlite_sequence";

    pub fn from_columns(columns: Vec<ColumnValue>) -> Result<Self> {
        let declared = columns.len();
        let [object_type, name, tbl_name, root_page, sql]: [ColumnValue; Self::NUM_COLUMNS] =
            columns
                .try_into()
                .map_err(|_| DecodeError::ColumnIndexOutOfRange {
                    requested: Self::NUM_COLUMNS,
                    declared,
                })?;

        Ok(Self {
            object_type: object_type.as_text().into_owned(),
            name: name.as_text().into_owned(),
            tbl_name: tbl_name.as_text().into_owned(),
            root_page,
            sql: sql.as_text().into_owned(),
        })
    }

    /// True for user-visible tables: type exactly "table", not sqlite_sequence
    pub fn is_user_table(&self) -> bool {
        self.object_type == "table" && self.name != Self::SEQUENCE_TABLE
    }
}
