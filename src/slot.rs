/// A single position in the table's slot array
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum Slot {
    /// Never written since the slot array was built; ends every probe walk
    #[default]
    Empty,
    /// Held an entry that was deleted; probe walks continue past it
    Tombstone,
    /// A live entry owning its own copy of the key and value
    Occupied {
        /// Key bytes
        key: Box<[u8]>,
        /// Value bytes
        value: Box<[u8]>,
    },
}

impl Slot {
    /// Returns true if an insert may write into this slot
    pub(crate) const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns true if this slot holds a live entry for `key`
    pub(crate) fn holds(&self, key: &[u8]) -> bool {
        match self {
            Self::Occupied { key: stored, .. } => **stored == *key,
            Self::Empty | Self::Tombstone => false,
        }
    }

    /// The live key and value, if any
    pub(crate) fn entry(&self) -> Option<(&[u8], &[u8])> {
        match self {
            Self::Occupied { key, value } => Some((&**key, &**value)),
            Self::Empty | Self::Tombstone => None,
        }
    }
}
