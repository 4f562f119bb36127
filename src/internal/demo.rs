//! Inserts three pairs into a fresh table and prints every occupied slot

use open_table::{Table, TableError};

fn main() -> Result<(), TableError> {
    env_logger::Builder::from_env(
        env_logger::Env::new().filter_or("OPEN_TABLE_LOG", "info").write_style("OPEN_TABLE_LOG_STYLE"),
    )
    .init();

    let mut table = Table::new();
    table.insert("cat", "cats")?;
    table.insert("dog", "dogs")?;
    table.insert("spider", "spiders")?;

    for (index, key, value) in table.entries() {
        println!(
            "Item {index} has key: {} and value: {}",
            String::from_utf8_lossy(key),
            String::from_utf8_lossy(value)
        );
    }

    log::info!(
        "{} entries in {} slots ({}% load)",
        table.len(),
        table.capacity(),
        table.load_percent()
    );
    table.destroy();
    Ok(())
}
