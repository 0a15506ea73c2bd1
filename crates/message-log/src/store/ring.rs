//! Slot records and all circular index/offset arithmetic for the store.

use std::ops::Range;

/// How a slot's bytes are held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Stored {
    /// The slot owns `arena[offset..offset + len]` and its terminator.
    Owned,
    /// The slot aliases the tail of the message stored in slot `owner`.
    SharesSuffixOf { owner: u32 },
}

/// Location of one message in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Slot {
    offset: u32,
    len: u32,
    pub(crate) stored: Stored,
}

impl Slot {
    pub(crate) const EMPTY: Self = Self {
        offset: 0,
        len: 0,
        stored: Stored::Owned,
    };

    pub(crate) fn owned(offset: usize, len: usize) -> Self {
        Self {
            offset: offset as u32,
            len: len as u32,
            stored: Stored::Owned,
        }
    }

    pub(crate) fn shared(offset: usize, len: usize, owner: usize) -> Self {
        Self {
            offset: offset as u32,
            len: len as u32,
            stored: Stored::SharesSuffixOf {
                owner: owner as u32,
            },
        }
    }

    pub(crate) fn start(&self) -> usize {
        self.offset as usize
    }

    pub(crate) fn len(&self) -> usize {
        self.len as usize
    }

    /// Index of the terminator byte.
    pub(crate) fn end(&self) -> usize {
        self.start() + self.len()
    }

    pub(crate) fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    pub(crate) fn is_shared(&self) -> bool {
        matches!(self.stored, Stored::SharesSuffixOf { .. })
    }

    /// Slot that owns the bytes this slot points at.
    pub(crate) fn owner_or(&self, own_index: usize) -> usize {
        match self.stored {
            Stored::Owned => own_index,
            Stored::SharesSuffixOf { owner } => owner as usize,
        }
    }
}

/// Slot index holding the message of the given age.
pub(crate) fn index_for_age(newest: usize, age: usize, slots: usize) -> usize {
    (newest + slots - age % slots) % slots
}

/// Age of the message currently held in `index`.
pub(crate) fn age_of_index(newest: usize, index: usize, slots: usize) -> usize {
    (newest + slots - index) % slots
}

pub(crate) fn next_index(index: usize, slots: usize) -> usize {
    (index + 1) % slots
}

/// Offsets at or past the arena end restart at zero.
pub(crate) fn wrap_offset(offset: usize, capacity: usize) -> usize {
    if offset >= capacity { 0 } else { offset }
}

/// Whether `slot` is untouched by a write covering `start..=end` (`end` is
/// the terminator of the message being written).
pub(crate) fn survives_write(slot: &Slot, start: usize, end: usize) -> bool {
    slot.end() < start || slot.start() > end + 1
}

/// Whether `slot` stays readable when the current message, which used to
/// start at `old_start`, is compacted into `0..=window_end`.
pub(crate) fn survives_compaction(slot: &Slot, old_start: usize, window_end: usize) -> bool {
    slot.end() < old_start && slot.start() > window_end + 1
}
