use std::collections::HashMap;
use std::hash::Hash;

/// Per-key scheduled tasks on a virtual millisecond clock.
///
/// Scheduling a key that is already pending cancels the old task and starts a
/// new one, so a burst only ever fires its last entry. Nothing runs by itself:
/// the owner asks for due entries with `take_due` and sleeps until
/// `next_deadline` in between.
#[derive(Debug)]
pub struct DebounceTable<K, V> {
    entries: HashMap<K, Scheduled<V>>,
    next_seq: u64,
}

#[derive(Debug)]
struct Scheduled<V> {
    deadline: u64,
    seq: u64,
    value: V,
}

impl<K: Eq + Hash + Clone, V> DebounceTable<K, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `value` to fire at `deadline`, replacing any pending task for `key`.
    /// Returns whether a pending task was replaced.
    pub fn schedule(&mut self, key: K, deadline: u64, value: V) -> bool {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries
            .insert(key, Scheduled { deadline, seq, value })
            .is_some()
    }

    pub fn cancel(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.values().map(|entry| entry.deadline).min()
    }

    /// Removes and returns every entry with `deadline <= now`, earliest first.
    pub fn take_due(&mut self, now: u64) -> Vec<(K, V)> {
        let due: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.deadline <= now)
            .map(|(key, _)| key.clone())
            .collect();
        self.remove_ordered(due, |entry| (entry.deadline, entry.seq))
    }

    /// Removes and returns everything, in scheduling order.
    pub fn drain(&mut self) -> Vec<(K, V)> {
        let keys: Vec<K> = self.entries.keys().cloned().collect();
        self.remove_ordered(keys, |entry| (entry.seq, 0))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_ordered(
        &mut self,
        keys: Vec<K>,
        order: impl Fn(&Scheduled<V>) -> (u64, u64),
    ) -> Vec<(K, V)> {
        let mut removed: Vec<(K, Scheduled<V>)> = keys
            .into_iter()
            .filter_map(|key| self.entries.remove(&key).map(|entry| (key, entry)))
            .collect();
        removed.sort_by_key(|(_, entry)| order(entry));
        removed
            .into_iter()
            .map(|(key, entry)| (key, entry.value))
            .collect()
    }
}

impl<K: Eq + Hash + Clone, V> Default for DebounceTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reschedule_replaces_pending_entry() {
        let mut table = DebounceTable::new();
        assert!(!table.schedule("field", 2000, "h"));
        assert!(table.schedule("field", 2500, "he"));
        assert!(table.schedule("field", 3000, "hello"));

        assert_eq!(table.len(), 1);
        assert!(table.take_due(2999).is_empty());
        assert_eq!(table.take_due(3000), vec![("field", "hello")]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_due_entries_come_out_earliest_first() {
        let mut table = DebounceTable::new();
        table.schedule("b", 300, 2);
        table.schedule("a", 100, 1);
        table.schedule("c", 900, 3);

        assert_eq!(table.next_deadline(), Some(100));
        assert_eq!(table.take_due(500), vec![("a", 1), ("b", 2)]);
        assert_eq!(table.next_deadline(), Some(900));
    }

    #[test]
    fn test_drain_uses_scheduling_order() {
        let mut table = DebounceTable::new();
        table.schedule("late", 5000, 'x');
        table.schedule("early", 100, 'y');
        assert_eq!(table.drain(), vec![("late", 'x'), ("early", 'y')]);
        assert_eq!(table.next_deadline(), None);
    }

    #[test]
    fn test_cancel() {
        let mut table: DebounceTable<&str, u8> = DebounceTable::default();
        table.schedule("hover", 300, 7);
        assert_eq!(table.cancel(&"hover"), Some(7));
        assert_eq!(table.cancel(&"hover"), None);
    }
}
