use crate::TableError;

/// Default base size of a new table; already prime
pub const DEFAULT_BASE_SIZE: usize = 53;
/// Default live load, in percent, at which insert grows the table
pub const DEFAULT_GROW_PERCENT: usize = 70;
/// Default live load, in percent, below which search and delete shrink the table
pub const DEFAULT_SHRINK_PERCENT: usize = 10;

/// Sizing and resize thresholds of a [`Table`](crate::Table)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Initial unscaled capacity; the table never shrinks below it
    pub base_size: usize,
    /// Load percentage at or above which insert grows the table
    pub grow_percent: usize,
    /// Load percentage below which search and delete shrink the table
    pub shrink_percent: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            base_size: DEFAULT_BASE_SIZE,
            grow_percent: DEFAULT_GROW_PERCENT,
            shrink_percent: DEFAULT_SHRINK_PERCENT,
        }
    }
}

impl TableConfig {
    /// Returns the default configuration with a different base size
    #[must_use]
    pub fn with_base_size(base_size: usize) -> Self {
        Self { base_size, ..Self::default() }
    }

    /// Checks the configuration for consistency
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidConfig`] if the base size is below 2, the grow
    /// threshold is outside `1..=95`, or the shrink threshold is not below the grow
    /// threshold.
    pub const fn validate(&self) -> Result<(), TableError> {
        if self.base_size < 2 {
            return Err(TableError::InvalidConfig("base size must be at least 2"));
        }
        if self.grow_percent == 0 || self.grow_percent > 95 {
            return Err(TableError::InvalidConfig("grow threshold must be within 1..=95 percent"));
        }
        if self.shrink_percent >= self.grow_percent {
            return Err(TableError::InvalidConfig(
                "shrink threshold must be below the grow threshold",
            ));
        }
        Ok(())
    }
}
