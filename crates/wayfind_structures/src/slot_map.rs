//! SlotMap - generational storage
//!
//! Keys stay valid until their value is removed; a key to a removed
//! value never resolves again, even after its slot is reused.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// Key into a [`SlotMap`], tagged with the stored type
pub struct SlotKey<T> {
    slot: u32,
    epoch: u32,
    _owner: PhantomData<fn() -> T>,
}

impl<T> SlotKey<T> {
    #[inline]
    const fn at(slot: u32, epoch: u32) -> Self {
        Self {
            slot,
            epoch,
            _owner: PhantomData,
        }
    }

    /// Slot position; reused once the value is removed
    #[inline]
    pub const fn index(&self) -> u32 {
        self.slot
    }

    /// Bumped every time the slot is vacated
    #[inline]
    pub const fn generation(&self) -> u32 {
        self.epoch
    }
}

// Manual impls: deriving would require `T` itself to implement each trait.
impl<T> Clone for SlotKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SlotKey<T> {}

impl<T> PartialEq for SlotKey<T> {
    fn eq(&self, other: &Self) -> bool {
        (self.slot, self.epoch) == (other.slot, other.epoch)
    }
}

impl<T> Eq for SlotKey<T> {}

impl<T> Hash for SlotKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.slot, self.epoch).hash(state);
    }
}

impl<T> fmt::Debug for SlotKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotKey({}@{})", self.slot, self.epoch)
    }
}

enum Entry<T> {
    Occupied { epoch: u32, value: T },
    /// Epoch the next occupant will get
    Vacant { epoch: u32 },
}

impl<T> Entry<T> {
    fn value_for(&self, epoch: u32) -> Option<&T> {
        match self {
            Entry::Occupied { epoch: e, value } if *e == epoch => Some(value),
            _ => None,
        }
    }
}

/// Generational index storage
pub struct SlotMap<T> {
    entries: Vec<Entry<T>>,
    vacant: Vec<u32>,
    live: usize,
}

impl<T> SlotMap<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            vacant: Vec::new(),
            live: 0,
        }
    }

    /// Store a value and get its key. Vacated slots are reused first.
    pub fn insert(&mut self, value: T) -> SlotKey<T> {
        self.live += 1;
        if let Some(slot) = self.vacant.pop() {
            let entry = &mut self.entries[slot as usize];
            let epoch = match *entry {
                Entry::Vacant { epoch } | Entry::Occupied { epoch, .. } => epoch,
            };
            *entry = Entry::Occupied { epoch, value };
            return SlotKey::at(slot, epoch);
        }
        let slot = self.entries.len() as u32;
        self.entries.push(Entry::Occupied { epoch: 0, value });
        SlotKey::at(slot, 0)
    }

    /// Take a value out; the key becomes stale
    pub fn remove(&mut self, key: SlotKey<T>) -> Option<T> {
        let entry = self.entries.get_mut(key.slot as usize)?;
        if entry.value_for(key.epoch).is_none() {
            return None;
        }
        let vacated = Entry::Vacant {
            epoch: key.epoch.wrapping_add(1),
        };
        match core::mem::replace(entry, vacated) {
            Entry::Occupied { value, .. } => {
                self.vacant.push(key.slot);
                self.live -= 1;
                Some(value)
            }
            Entry::Vacant { .. } => None,
        }
    }

    pub fn get(&self, key: SlotKey<T>) -> Option<&T> {
        self.entries.get(key.slot as usize)?.value_for(key.epoch)
    }

    pub fn get_mut(&mut self, key: SlotKey<T>) -> Option<&mut T> {
        match self.entries.get_mut(key.slot as usize)? {
            Entry::Occupied { epoch, value } if *epoch == key.epoch => Some(value),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: SlotKey<T>) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (SlotKey<T>, &T)> {
        self.entries.iter().zip(0u32..).filter_map(|(entry, slot)| match entry {
            Entry::Occupied { epoch, value } => Some((SlotKey::at(slot, *epoch), value)),
            Entry::Vacant { .. } => None,
        })
    }

    /// Live values in slot order
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.iter().map(|(_, value)| value)
    }
}

impl<T> Default for SlotMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for SlotMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_map_insert_get() {
        let mut map = SlotMap::new();
        let wall = map.insert("wall");
        let door = map.insert("door");
        assert_eq!(map.get(wall), Some(&"wall"));
        assert_eq!(map.get(door), Some(&"door"));
        assert_eq!(map.len(), 2);

        *map.get_mut(door).unwrap() = "open door";
        assert_eq!(map.values().copied().collect::<Vec<_>>(), vec!["wall", "open door"]);
    }

    #[test]
    fn test_slot_map_stale_key() {
        let mut map = SlotMap::new();
        let old = map.insert(1);
        assert_eq!(map.remove(old), Some(1));
        assert_eq!(map.remove(old), None);
        assert!(map.is_empty());

        let new = map.insert(2);
        assert_eq!(old.index(), new.index());
        assert_eq!(new.generation(), old.generation() + 1);
        assert_ne!(old, new);
        assert_eq!(map.get(old), None);
        assert_eq!(map.get(new), Some(&2));
    }

    #[test]
    fn test_slot_key_without_bounds_on_value() {
        struct Opaque;
        let mut map = SlotMap::new();
        let key = map.insert(Opaque);
        let copy = key;
        assert_eq!(key, copy);
        assert!(map.contains_key(copy));
        assert_eq!(map.values().count(), 1);
    }
}
