//! # Open Table
//!
//! A hash table mapping byte-string keys to byte-string values, built directly on an
//! array of slots with open addressing.
//!
//! - Collisions are resolved by double hashing: two polynomial string hashes with
//!   different prime multipliers give each key its own start slot and step size.
//! - The slot count is always prime, so every probe walk can reach every slot.
//! - Deleted entries leave tombstones, keeping probe chains through them intact.
//! - The table grows once its load reaches 70% and shrinks once it drops below 10%,
//!   never going below its initial size.
//!
//! ## Basic Usage
//!
//! ```rust
//! use open_table::Table;
//!
//! let mut table = Table::new();
//!
//! table.insert("cat", "cats")?;
//! table.insert("dog", "dogs")?;
//! table.insert("spider", "spiders")?;
//!
//! assert_eq!(table.search("dog")?, Some(&b"dogs"[..]));
//!
//! table.delete("cat")?;
//! assert_eq!(table.search("cat")?, None);
//! assert_eq!(table.search("spider")?, Some(&b"spiders"[..]));
//! # Ok::<(), open_table::TableError>(())
//! ```
//!
//! ## Duplicate keys
//!
//! [`Table::insert`] never looks for an existing entry, so inserting a key twice stores
//! it twice. [`Table::upsert`] replaces the value instead:
//!
//! ```rust
//! use open_table::Table;
//!
//! let mut table = Table::new();
//! table.upsert("apple", "red")?;
//! assert_eq!(table.upsert("apple", "green")?, Some(b"red".to_vec()));
//! assert_eq!(table.len(), 1);
//! # Ok::<(), open_table::TableError>(())
//! ```

/// Sizing and threshold configuration
mod config;
/// Error type for table operations
mod error;
/// Polynomial hashes and the probe sequence
pub mod hash;
/// Prime search for slot counts
pub mod prime;
/// Slot states
mod slot;
/// The table engine and resize controller
mod table;
/// Utility functions and traits for the table
mod utils;

pub use config::{DEFAULT_BASE_SIZE, DEFAULT_GROW_PERCENT, DEFAULT_SHRINK_PERCENT, TableConfig};
pub use error::TableError;
pub use table::{Iter, Table};
pub use utils::{TableExtensions, from_pairs};
