//! Utility functions and traits for [`Table`]

use crate::{Table, TableError};

/// Extension trait that collects owned copies out of a table
pub trait TableExtensions {
    /// Returns the keys of every live entry as a Vec
    fn keys(&self) -> Vec<Vec<u8>>;

    /// Returns the values of every live entry as a Vec
    fn values(&self) -> Vec<Vec<u8>>;
}

impl TableExtensions for Table {
    fn keys(&self) -> Vec<Vec<u8>> {
        self.iter().map(|(k, _)| k.to_vec()).collect()
    }

    fn values(&self) -> Vec<Vec<u8>> {
        self.iter().map(|(_, v)| v.to_vec()).collect()
    }
}

/// Creates a [`Table`] from an iterator of key-value pairs.
///
/// Pairs are added with [`Table::insert`], so repeated keys produce repeated entries.
///
/// # Errors
///
/// Returns the first error reported by [`Table::insert`].
pub fn from_pairs<K, V, I>(iter: I) -> Result<Table, TableError>
where
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut table = Table::new();

    for (key, value) in iter {
        table.insert(key, value)?;
    }

    Ok(table)
}
