//! Fixed-capacity message history.
//!
//! Messages live in one circular byte arena addressed through a ring of slot
//! records. Every message has an *age*: `0` for the newest, increasing as
//! newer messages arrive. The newest message may still be appended to, which
//! can move it (like `realloc`). Old messages are forgotten strictly in age
//! order, either when the slot ring is full or when a write reclaims their
//! bytes.
//!
//! Consecutive messages share storage when the newer one is a byte-exact
//! suffix of the older one ("hits you." after "The orc hits you."). The alias
//! is tracked on the slot, so appending to a shared message first gives it
//! bytes of its own.

mod ring;

use tracing::{debug, trace, warn};

use crate::config::HistoryConfig;
use ring::{Slot, Stored};

/// Circular store of the most recent messages.
#[derive(Debug)]
pub struct MessageStore {
    arena: Box<[u8]>,
    slots: Box<[Slot]>,
    /// Slot index of the newest message.
    newest: usize,
    /// Number of retained messages older than the newest.
    age_count: usize,
    /// Where the next owned message starts.
    free: usize,
}

impl MessageStore {
    pub fn new(config: &HistoryConfig) -> Self {
        let config = config.clone().normalized();
        Self {
            arena: vec![0; config.arena_bytes].into_boxed_slice(),
            slots: vec![Slot::EMPTY; config.slots].into_boxed_slice(),
            newest: 0,
            age_count: 0,
            free: 0,
        }
    }

    pub fn with_capacity(slots: usize, arena_bytes: usize) -> Self {
        Self::new(&HistoryConfig::new(slots, arena_bytes))
    }

    /// Forget every message.
    pub fn reset(&mut self) {
        self.arena.fill(0);
        self.slots.fill(Slot::EMPTY);
        self.newest = 0;
        self.age_count = 0;
        self.free = 0;
    }

    /// Number of slots (`N`).
    pub fn slot_capacity(&self) -> usize {
        self.slots.len()
    }

    /// Size of the text arena in bytes (`B`).
    pub fn arena_capacity(&self) -> usize {
        self.arena.len()
    }

    /// Number of addressable messages, newest included.
    pub fn count(&self) -> u32 {
        (self.age_count + 1) as u32
    }

    /// Byte length of the message at `age`, or 0 if it has been forgotten.
    pub fn length(&self, age: u32) -> u32 {
        self.slot(age).map_or(0, |slot| slot.len() as u32)
    }

    /// Raw bytes of the message at `age`; empty if forgotten.
    pub fn bytes(&self, age: u32) -> &[u8] {
        self.slot(age).map_or(&[][..], |slot| &self.arena[slot.range()])
    }

    /// Text of the message at `age`; empty if forgotten.
    ///
    /// A message cut through a multi-byte character by truncation reads back
    /// as its longest valid prefix.
    pub fn text(&self, age: u32) -> &str {
        let bytes = self.bytes(age);
        match std::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => std::str::from_utf8(&bytes[..err.valid_up_to()]).unwrap_or_default(),
        }
    }

    /// Retained messages, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.count()).map(move |age| self.text(age))
    }

    /// Age of the message whose bytes the message at `age` aliases, if any.
    pub fn shared_with(&self, age: u32) -> Option<u32> {
        let slot = self.slot(age)?;
        let Stored::SharesSuffixOf { owner } = slot.stored else {
            return None;
        };
        let owner_age = ring::age_of_index(self.newest, owner as usize, self.slots.len());
        (owner_age > age as usize && owner_age <= self.age_count).then_some(owner_age as u32)
    }

    /// Arena bytes held by retained messages, terminators included.
    ///
    /// Shared messages cost nothing beyond their owner.
    pub fn used_bytes(&self) -> usize {
        (0..=self.age_count)
            .map(|age| self.slots[self.index(age)])
            .filter(|slot| !slot.is_shared())
            .map(|slot| slot.len() + 1)
            .sum()
    }

    /// Start a new newest message containing `text`.
    pub fn begin(&mut self, text: &[u8]) {
        let current = self.slots[self.newest];

        // The very first message fills slot 0 instead of advancing past it.
        if self.age_count == 0 && current.len() == 0 {
            self.append(text);
            return;
        }

        self.share_current_with_previous();

        let current = self.slots[self.newest];
        let next = ring::next_index(self.newest, self.slots.len());

        if let Some(offset) = self.suffix_of_current(text) {
            trace!(len = text.len(), offset, "new message shares suffix of previous");
            let owner = current.owner_or(self.newest);
            self.advance(next, Slot::shared(offset, text.len(), owner));
            return;
        }

        self.advance(next, Slot::owned(self.free, 0));
        self.append(text);
    }

    /// Append `text` to the newest message.
    ///
    /// Text that cannot fit in the arena alongside the existing bytes is
    /// truncated. Older messages in the way of the write are forgotten,
    /// oldest first.
    pub fn append(&mut self, text: &[u8]) {
        let capacity = self.arena.len();
        let current = self.slots[self.newest];

        if text.is_empty() && current.is_shared() {
            return;
        }

        let existing = current.len();
        let source = current.start();
        let mut start = if current.is_shared() {
            trace!(len = existing, "relocating shared message before append");
            self.free
        } else {
            source
        };

        let mut len = text.len();
        if len + existing + 2 >= capacity {
            let fit = capacity.saturating_sub(existing + 2);
            warn!(requested = len, kept = fit, "message truncated to fit history arena");
            len = fit;
        }

        if start + existing + len + 1 >= capacity {
            let window_end = existing + len;
            self.forget_oldest_while(|slot| !ring::survives_compaction(slot, start, window_end));
            debug!(
                from = start,
                len = existing,
                retained = self.age_count,
                "compacting current message to arena start"
            );
            start = 0;
        }

        let end = start + existing + len;
        self.forget_oldest_while(|slot| !ring::survives_write(slot, start, end));

        if source != start {
            self.arena.copy_within(source..source + existing, start);
        }
        self.arena[start + existing..end].copy_from_slice(&text[..len]);
        self.arena[end] = 0;

        self.slots[self.newest] = Slot::owned(start, existing + len);
        self.free = ring::wrap_offset(end + 1, capacity);
    }

    fn slot(&self, age: u32) -> Option<Slot> {
        let age = age as usize;
        (age <= self.age_count).then(|| self.slots[self.index(age)])
    }

    fn index(&self, age: usize) -> usize {
        ring::index_for_age(self.newest, age, self.slots.len())
    }

    fn advance(&mut self, next: usize, slot: Slot) {
        self.newest = next;
        self.slots[next] = slot;
        if self.age_count + 1 < self.slots.len() {
            self.age_count += 1;
        } else {
            trace!("slot ring full, oldest message forgotten");
        }
    }

    /// Re-point the newest message at its predecessor's tail when their
    /// bytes match, reclaiming the newest message's own storage.
    fn share_current_with_previous(&mut self) {
        if self.age_count == 0 {
            return;
        }
        let current = self.slots[self.newest];
        if current.is_shared() || current.len() == 0 {
            return;
        }

        let prev_index = self.index(1);
        let previous = self.slots[prev_index];
        if previous.len() < current.len() {
            return;
        }

        let tail = previous.end() - current.len();
        if self.arena[current.range()] != self.arena[tail..previous.end()] {
            return;
        }

        trace!(len = current.len(), "current message folded into previous suffix");
        self.slots[self.newest] = Slot::shared(tail, current.len(), previous.owner_or(prev_index));
        self.free = ring::wrap_offset(previous.end() + 1, self.arena.len());
    }

    /// Offset of the newest message's tail when it equals `text`.
    fn suffix_of_current(&self, text: &[u8]) -> Option<usize> {
        let current = self.slots[self.newest];
        if text.is_empty() || current.len() < text.len() {
            return None;
        }
        let start = current.end() - text.len();
        (self.arena[start..current.end()] == *text).then_some(start)
    }

    fn forget_oldest_while(&mut self, mut overwritten: impl FnMut(&Slot) -> bool) {
        while self.age_count > 0 {
            let oldest = self.slots[self.index(self.age_count)];
            if !overwritten(&oldest) {
                break;
            }
            self.age_count -= 1;
            trace!(retained = self.age_count, "oldest message forgotten");
        }
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new(&HistoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_in_bounds(store: &MessageStore) {
        assert!(store.age_count < store.slots.len());
        for age in 0..=store.age_count {
            let slot = store.slots[store.index(age)];
            assert!(slot.end() < store.arena.len(), "slot {slot:?} escapes arena");
        }
    }

    #[test]
    fn fresh_store_has_one_empty_message() {
        let store = MessageStore::default();
        assert_eq!(store.count(), 1);
        assert_eq!(store.length(0), 0);
        assert_eq!(store.text(0), "");
    }

    #[test]
    fn first_begin_fills_slot_zero() {
        let mut store = MessageStore::default();
        store.begin(b"You die.");
        assert_eq!(store.count(), 1);
        assert_eq!(store.text(0), "You die.");
        assert_eq!(store.length(0), 8);
    }

    #[test]
    fn begin_then_append_concatenates() {
        let mut store = MessageStore::default();
        store.begin(b"The door");
        store.begin(b"The orc");
        store.append(b" hits");
        store.append(b" you.");
        assert_eq!(store.count(), 2);
        assert_eq!(store.text(0), "The orc hits you.");
        assert_eq!(store.length(0), 17);
        assert_eq!(store.text(1), "The door");
    }

    #[test]
    fn forgotten_ages_read_empty() {
        let mut store = MessageStore::default();
        store.begin(b"one");
        store.begin(b"two");
        assert_eq!(store.length(2), 0);
        assert_eq!(store.text(7), "");
        assert_eq!(store.shared_with(9), None);
    }

    #[test]
    fn suffix_is_shared_without_new_bytes() {
        let mut store = MessageStore::default();
        store.begin(b"orc hits you");
        let before = store.used_bytes();

        store.begin(b"hits you");
        assert_eq!(store.used_bytes(), before);
        assert_eq!(store.text(0), "hits you");
        assert_eq!(store.text(1), "orc hits you");
        assert_eq!(store.shared_with(0), Some(1));
    }

    #[test]
    fn identical_repeats_chain_onto_one_owner() {
        let mut store = MessageStore::default();
        store.begin(b"You are hit.");
        store.begin(b"You are hit.");
        store.begin(b"You are hit.");
        assert_eq!(store.count(), 3);
        assert_eq!(store.used_bytes(), 13);
        assert_eq!(store.shared_with(0), Some(2));
        assert!(store.iter().all(|text| text == "You are hit."));
    }

    #[test]
    fn appended_message_is_folded_into_previous_suffix() {
        let mut store = MessageStore::default();
        store.begin(b"orc hits you");
        store.begin(b"hits");
        store.append(b" you");
        assert_eq!(store.shared_with(0), None);
        assert_eq!(store.used_bytes(), 13 + 9);

        store.begin(b"x");
        assert_eq!(store.shared_with(1), Some(2));
        assert_eq!(store.text(1), "hits you");
        assert_eq!(store.used_bytes(), 13 + 2);
    }

    #[test]
    fn appending_to_shared_message_relocates_it() {
        let mut store = MessageStore::default();
        store.begin(b"orc hits you");
        store.begin(b"hits you");
        store.append(b" hard");

        assert_eq!(store.shared_with(0), None);
        assert_eq!(store.text(0), "hits you hard");
        assert_eq!(store.text(1), "orc hits you");
    }

    #[test]
    fn longer_message_is_not_shared() {
        let mut store = MessageStore::default();
        store.begin(b"hits you");
        store.begin(b"orc hits you");
        assert_eq!(store.shared_with(0), None);
        assert_eq!(store.used_bytes(), 9 + 13);
    }

    #[test]
    fn slot_ring_saturates_and_forgets_oldest() {
        let mut store = MessageStore::with_capacity(4, 1000);
        for i in 0..10 {
            store.begin(format!("message {i}").as_bytes());
        }
        assert_eq!(store.count(), 4);
        assert_eq!(store.text(0), "message 9");
        assert_eq!(store.text(3), "message 6");
        assert_eq!(store.length(4), 0);
    }

    #[test]
    fn wrap_forgets_messages_in_the_compacted_window() {
        let mut store = MessageStore::with_capacity(16, 64);
        for i in 0..7 {
            store.begin(format!("message-{i}").as_bytes());
        }
        // Six 9-byte messages fit (0, 10, .., 50); the seventh would cross
        // the end, so it is compacted to 0 over the two oldest.
        assert_eq!(store.count(), 5);
        assert_eq!(store.text(0), "message-6");
        assert_eq!(store.text(4), "message-2");
        assert_in_bounds(&store);
    }

    #[test]
    fn oversized_message_is_truncated() {
        let mut store = MessageStore::with_capacity(8, 32);
        let long = [b'x'; 100];
        store.begin(b"first");
        store.begin(&long);
        assert_eq!(store.length(0), 30);
        assert_eq!(store.count(), 1);
        assert_in_bounds(&store);
    }

    #[test]
    fn append_beyond_capacity_keeps_existing_bytes() {
        let mut store = MessageStore::with_capacity(8, 32);
        store.begin(b"abcdefghij");
        store.append(&[b'z'; 40]);
        assert_eq!(store.length(0), 30);
        assert!(store.text(0).starts_with("abcdefghij"));
    }

    #[test]
    fn truncation_never_splits_a_character_on_read() {
        let mut store = MessageStore::with_capacity(4, 16);
        store.begin("ééééééééé".as_bytes());
        // 14 bytes kept, seven whole characters.
        assert_eq!(store.length(0), 14);
        assert_eq!(store.text(0), "ééééééé");

        store.reset();
        store.begin("aéééééééé".as_bytes());
        assert_eq!(store.length(0), 14);
        assert_eq!(store.text(0), "aéééééé");
    }

    #[test]
    fn reset_forgets_everything() {
        let mut store = MessageStore::with_capacity(8, 64);
        store.begin(b"alpha");
        store.begin(b"beta");
        store.reset();
        assert_eq!(store.count(), 1);
        assert_eq!(store.text(0), "");
        store.begin(b"gamma");
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn retained_messages_stay_intact_under_pressure() {
        let mut store = MessageStore::with_capacity(12, 97);
        let mut written: Vec<String> = Vec::new();
        let mut seed: u32 = 0x2545_f491;
        let words = ["hit", "miss", "You are hit.", "hit.", "The orc hits you.", ""];

        for step in 0..600 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let pick = (seed >> 16) as usize;
            let text = match pick % 4 {
                0 => words[pick % words.len()].to_string(),
                1 => format!("#{step} {}", "=".repeat(pick % 23)),
                _ => format!("msg {step}"),
            };

            if pick % 7 == 0 && !written.is_empty() {
                store.append(b"+");
                if let Some(last) = written.last_mut() {
                    last.push('+');
                }
            } else {
                store.begin(text.as_bytes());
                written.push(text);
            }

            assert_in_bounds(&store);
            let retained = store.count() as usize;
            assert!(retained <= written.len());
            for age in 0..retained {
                let expected = &written[written.len() - 1 - age];
                assert_eq!(store.text(age as u32), expected, "age {age} at step {step}");
            }
        }
    }

    #[test]
    fn forgetting_is_age_ordered() {
        let mut store = MessageStore::with_capacity(32, 80);
        let mut previous_count = store.count();
        for i in 0..200u32 {
            store.begin(format!("n{i:04}").as_bytes());
            let count = store.count();
            // At most one message is added per step; anything lost comes off the old end.
            assert!(count <= previous_count + 1);
            let oldest_seq: u32 = store.text(count - 1)[1..].parse().unwrap();
            assert_eq!(oldest_seq, i + 1 - count);
            previous_count = count;
        }
    }
}
