//! Read-only decoding of the SQLite on-disk format.

pub mod btree;
pub mod core;
pub mod db;
pub mod error;

pub use db::{SQLiteDatabase, SQLiteDatabaseInfo};
pub use error::DecodeError;
