//! Dense Slot Maps - Stable Keys, Super-Fast Iteration, Double Indirection on Access
//!
//! A dense slot map stores all of it's values in one contiguous `Vec<_>`, with
//! no holes, and stores the slot table separately. Looking up a key goes through
//! the slot table to find the value's position in dense storage, so access costs
//! a double indirection. The benefit is iteration: iterating over the values is
//! just iterating over a slice.
//!
//! Removal swaps the last value into the removed position (swap-and-pop), so it
//! is O(1) but does *not* preserve iteration order. A parallel `Vec` of keys lets
//! the map find the slot of the value that was moved and point it at its new
//! position.
//!
//! Each slot is tagged with a [`Generation`]. See [`Generation`] for docs on
//! generation exhaustion. Once a slot's generation exhausts, it will not be reused.

use core::{
    fmt,
    iter::{FromIterator, FusedIterator},
    ops::{Index, IndexMut},
};

use std::vec::Vec;

use crate::{
    generation::Generation,
    key::{Key, Slot},
    KeyError,
};

/// A dense slot map
pub struct DenseSlotMap<T, Tag = (), G = u32> {
    slots: Vec<Slot<G>>,
    keys: Vec<Key<Tag, G>>,
    values: Vec<T>,
    free_head: usize,
}

/// An empty slot in a dense slot map
pub struct VacantEntry<'a, T, Tag, G: Generation> {
    map: &'a mut DenseSlotMap<T, Tag, G>,
}

impl<T> DenseSlotMap<T> {
    /// Create a new, empty slot map
    ///
    /// The slot map will not allocate values until they are inserted.
    pub fn new() -> Self { Self::tagged() }

    /// Create a new, empty slot map with room for `capacity` values
    pub fn with_capacity(capacity: usize) -> Self { Self::tagged_with_capacity(capacity) }
}

impl<T, Tag, G: Generation> Default for DenseSlotMap<T, Tag, G> {
    fn default() -> Self { Self::tagged() }
}

impl<T: Clone, Tag, G: Generation> Clone for DenseSlotMap<T, Tag, G> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            keys: self.keys.clone(),
            values: self.values.clone(),
            free_head: self.free_head,
        }
    }
}

impl<T, Tag, G: Generation> DenseSlotMap<T, Tag, G> {
    /// Create a new, empty slot map with a caller chosen tag and generation
    pub fn tagged() -> Self { Self::tagged_with_capacity(0) }

    /// Create a new, empty slot map with a caller chosen tag and generation,
    /// and room for `capacity` values
    pub fn tagged_with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.saturating_add(1));
        slots.push(Slot::SENTINEL);

        Self {
            slots,
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            free_head: 1,
        }
    }

    /// Returns true if the slot map is empty
    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// Returns the number of values in this slot map
    pub fn len(&self) -> usize { self.values.len() }

    /// Returns the number of values this slot map can hold without reallocating
    /// the dense storage
    pub fn capacity(&self) -> usize { self.values.capacity() }

    /// Reserves capacity for at least additional more elements to be inserted
    /// in the given slot map. The collection may reserve more space to avoid
    /// frequent reallocations. Does nothing if capacity is already sufficient.
    pub fn reserve(&mut self, additional: usize) {
        self.values.reserve(additional);
        self.keys.reserve(additional);

        let slots = self.len().saturating_add(additional).saturating_add(1);
        self.slots.reserve(slots.saturating_sub(self.slots.len()));
    }

    /// The dense storage, in iteration order
    pub fn values(&self) -> &[T] { &self.values }

    /// The dense storage, in iteration order
    ///
    /// Values may be mutated in place, but not moved around.
    pub fn values_mut(&mut self) -> &mut [T] { &mut self.values }

    fn next_key(&self) -> Key<Tag, G> {
        match self.slots.get(self.free_head) {
            Some(slot) => Key::new(self.free_head, slot.generation.occupy()),
            None => Key::new(self.slots.len(), G::VACANT.occupy()),
        }
    }

    fn dense_index(&self, key: Key<Tag, G>) -> Result<usize, KeyError> {
        let index = key.index();

        match self.slots.get(index) {
            Some(slot) if slot.matches(*key.generation()) => Ok(slot.payload),
            Some(_) => Err(KeyError::Stale { index }),
            None => Err(KeyError::OutOfBounds {
                index,
                slots: self.slots.len(),
            }),
        }
    }
}

impl<'a, T, Tag, G: Generation> VacantEntry<'a, T, Tag, G> {
    /// Get the key associated with the `VacantEntry`, this key can be used
    /// once this `VacantEntry` gets filled
    pub fn key(&self) -> Key<Tag, G> { self.map.next_key() }

    /// Insert an element into the vacant entry
    pub fn insert(self, value: T) -> Key<Tag, G> { self.map.insert(value) }
}

impl<T, Tag, G: Generation> DenseSlotMap<T, Tag, G> {
    /// Return a handle to a vacant entry allowing for further manipulation.
    ///
    /// This function is useful when creating values that must contain their
    /// key. The key reported by the `VacantEntry` is the key its insertion
    /// will return.
    pub fn vacant_entry(&mut self) -> VacantEntry<'_, T, Tag, G> { VacantEntry { map: self } }

    /// Insert a value in the slot map, returning key assigned to the value.
    ///
    /// The returned key can later be used to retrieve or remove the value.
    /// Vacant slots are reused most recently freed first, additional
    /// capacity is allocated if needed.
    pub fn insert(&mut self, value: T) -> Key<Tag, G> {
        let value_index = self.values.len();
        self.values.push(value);

        let index = self.free_head;
        let key = match self.slots.get_mut(index) {
            Some(slot) => {
                self.free_head = slot.payload;
                slot.generation = slot.generation.occupy();
                slot.payload = value_index;
                Key::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len();
                let generation = G::VACANT.occupy();
                self.slots.push(Slot {
                    payload: value_index,
                    generation,
                });
                self.free_head = index + 1;
                Key::new(index, generation)
            }
        };

        self.keys.push(key);
        key
    }

    /// Insert a value built from the key it will be stored under
    pub fn insert_with_key<F: FnOnce(Key<Tag, G>) -> T>(&mut self, f: F) -> Key<Tag, G> {
        let entry = self.vacant_entry();
        let key = entry.key();
        entry.insert(f(key))
    }

    /// Return true if a value is associated with the given key.
    pub fn contains(&self, key: Key<Tag, G>) -> bool { self.dense_index(key).is_ok() }

    /// Remove and return the value associated with the given key.
    ///
    /// The key's slot is then released and will be associated with future
    /// stored values, under a newer generation.
    ///
    /// Panics if key is not associated with a value.
    #[track_caller]
    pub fn remove(&mut self, key: Key<Tag, G>) -> T {
        match self.take(key) {
            Ok(value) => value,
            Err(err) => panic!("Could not remove from a `DenseSlotMap` using an invalid `Key`: {}", err),
        }
    }

    /// Remove and return the value associated with the given key.
    ///
    /// The last value in dense storage is moved into the removed position.
    ///
    /// Returns `None` if key is not associated with a value.
    pub fn pop(&mut self, key: Key<Tag, G>) -> Option<T> { self.take(key).ok() }

    fn take(&mut self, key: Key<Tag, G>) -> Result<T, KeyError> {
        let value_index = self.dense_index(key)?;
        self.release_slot(key.index());
        Ok(self.swap_remove(value_index))
    }

    fn release_slot(&mut self, index: usize) {
        let slot = &mut self.slots[index];

        match slot.generation.vacate() {
            Ok(generation) => {
                slot.generation = generation;
                slot.payload = self.free_head;
                self.free_head = index;
            }
            Err(generation) => {
                slot.generation = generation;
                slot.payload = usize::MAX;
                log::debug!("retiring slot {} after exhausting its generations", index);
            }
        }
    }

    // the slot owning `value_index` must already be released
    fn swap_remove(&mut self, value_index: usize) -> T {
        let value = self.values.swap_remove(value_index);
        self.keys.swap_remove(value_index);

        if let Some(moved) = self.keys.get(value_index) {
            self.slots[moved.index()].payload = value_index;
        }

        value
    }

    /// Return a shared reference to the value associated with the given key.
    ///
    /// If the given key is not associated with a value, then None is returned.
    pub fn get(&self, key: Key<Tag, G>) -> Option<&T> {
        let index = self.dense_index(key).ok()?;
        self.values.get(index)
    }

    /// Return a unique reference to the value associated with the given key.
    ///
    /// If the given key is not associated with a value, then None is returned.
    pub fn get_mut(&mut self, key: Key<Tag, G>) -> Option<&mut T> {
        let index = self.dense_index(key).ok()?;
        self.values.get_mut(index)
    }

    /// Return a shared reference to the value associated with the given key,
    /// or the reason the key could not be resolved
    pub fn try_get(&self, key: Key<Tag, G>) -> Result<&T, KeyError> {
        let index = self.dense_index(key)?;
        Ok(&self.values[index])
    }

    /// Return a unique reference to the value associated with the given key,
    /// or the reason the key could not be resolved
    pub fn try_get_mut(&mut self, key: Key<Tag, G>) -> Result<&mut T, KeyError> {
        let index = self.dense_index(key)?;
        Ok(&mut self.values[index])
    }

    /// Removes every value, invalidating all keys issued so far
    ///
    /// Every slot (except for retired ones) is relinked into the free list in
    /// ascending order, so later insertions fill the slot table from the front.
    pub fn clear(&mut self) {
        let mut next = self.slots.len();
        let mut relinked = 0;

        for (index, slot) in self.slots.iter_mut().enumerate().skip(1).rev() {
            if slot.is_occupied() {
                match slot.generation.vacate() {
                    Ok(generation) => slot.generation = generation,
                    Err(generation) => {
                        slot.generation = generation;
                        slot.payload = usize::MAX;
                        log::debug!("retiring slot {} after exhausting its generations", index);
                        continue
                    }
                }
            } else if slot.generation.is_exhausted() {
                continue
            }

            slot.payload = next;
            next = index;
            relinked += 1;
        }

        self.free_head = next;
        self.keys.clear();

        log::trace!("cleared {} values, relinked {} slots", self.values.len(), relinked);
        self.values.clear();
    }

    /// Retain only the elements specified by the predicate.
    ///
    /// If the predicate returns for a given element true,
    /// then the element is kept in the slot map.
    pub fn retain<F: FnMut(Key<Tag, G>, &mut T) -> bool>(&mut self, mut f: F) {
        for value_index in (0..self.values.len()).rev() {
            let key = self.keys[value_index];

            if !f(key, &mut self.values[value_index]) {
                self.release_slot(key.index());
                self.swap_remove(value_index);
            }
        }
    }

    /// An iterator over the keys of the slot map, in dense order
    pub fn keys(&self) -> Keys<'_, Tag, G> { Keys(self.keys.iter().copied()) }

    /// An iterator of shared references to values of the slot map,
    /// in dense order
    pub fn iter(&self) -> core::slice::Iter<'_, T> { self.values.iter() }

    /// An iterator of unique references to values of the slot map,
    /// in dense order
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> { self.values.iter_mut() }

    /// Return a draining iterator that removes all elements from the
    /// slot map and yields the removed items along with their keys.
    ///
    /// Note: Elements are removed even if the iterator is only partially
    /// consumed or not consumed at all.
    pub fn drain(&mut self) -> Drain<'_, T, Tag, G> { Drain { map: self } }

    /// An iterator of keys and shared references to values of the slot map,
    /// in dense order, with each key being associated to the corrosponding value
    pub fn entries(&self) -> Entries<'_, T, Tag, G> { Entries(self.keys.iter().copied().zip(self.values.iter())) }

    /// An iterator of keys and unique references to values of the slot map,
    /// in dense order, with each key being associated to the corrosponding value
    pub fn entries_mut(&mut self) -> EntriesMut<'_, T, Tag, G> {
        EntriesMut(self.keys.iter().copied().zip(self.values.iter_mut()))
    }

    /// An iterator of keys and values of the slot map, in dense order,
    /// with each key being associated to the corrosponding value
    pub fn into_entries(self) -> IntoEntries<T, Tag, G> { IntoEntries(self.keys.into_iter().zip(self.values)) }
}

impl<T, Tag, G: Generation> IntoIterator for DenseSlotMap<T, Tag, G> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter { self.values.into_iter() }
}

impl<'a, T, Tag, G: Generation> IntoIterator for &'a DenseSlotMap<T, Tag, G> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter { self.values.iter() }
}

impl<'a, T, Tag, G: Generation> IntoIterator for &'a mut DenseSlotMap<T, Tag, G> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter { self.values.iter_mut() }
}

impl<T, Tag, G: Generation> Index<Key<Tag, G>> for DenseSlotMap<T, Tag, G> {
    type Output = T;

    #[track_caller]
    fn index(&self, key: Key<Tag, G>) -> &Self::Output {
        match self.try_get(key) {
            Ok(value) => value,
            Err(err) => panic!("Tried to access `DenseSlotMap` with an invalid `Key`: {}", err),
        }
    }
}

impl<T, Tag, G: Generation> IndexMut<Key<Tag, G>> for DenseSlotMap<T, Tag, G> {
    #[track_caller]
    fn index_mut(&mut self, key: Key<Tag, G>) -> &mut Self::Output {
        match self.try_get_mut(key) {
            Ok(value) => value,
            Err(err) => panic!("Tried to access `DenseSlotMap` with an invalid `Key`: {}", err),
        }
    }
}

impl<T, Tag, G: Generation> Extend<T> for DenseSlotMap<T, Tag, G> {
    fn extend<Iter: IntoIterator<Item = T>>(&mut self, iter: Iter) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        iter.for_each(move |value| {
            self.insert(value);
        });
    }
}

impl<T, Tag, G: Generation> FromIterator<T> for DenseSlotMap<T, Tag, G> {
    fn from_iter<Iter: IntoIterator<Item = T>>(iter: Iter) -> Self {
        let mut map = Self::tagged();
        map.extend(iter);
        map
    }
}

impl<T: fmt::Debug, Tag, G: Generation> fmt::Debug for DenseSlotMap<T, Tag, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseSlotMap")
            .field("slots", &self.slots)
            .field("values", &self.values)
            .field("keys", &self.keys)
            .field("free_head", &self.free_head)
            .finish()
    }
}

macro_rules! forward_iterator {
    (impl[$($params:tt)*] $iter:ty => $item:ty) => {
        impl<$($params)*> Iterator for $iter {
            type Item = $item;

            fn next(&mut self) -> Option<Self::Item> { self.0.next() }

            fn nth(&mut self, n: usize) -> Option<Self::Item> { self.0.nth(n) }

            fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
        }

        impl<$($params)*> DoubleEndedIterator for $iter {
            fn next_back(&mut self) -> Option<Self::Item> { self.0.next_back() }

            fn nth_back(&mut self, n: usize) -> Option<Self::Item> { self.0.nth_back(n) }
        }

        impl<$($params)*> ExactSizeIterator for $iter {}
        impl<$($params)*> FusedIterator for $iter {}
    };
}

/// Returned by [`DenseSlotMap::keys`]
pub struct Keys<'a, Tag, G>(core::iter::Copied<core::slice::Iter<'a, Key<Tag, G>>>);

forward_iterator! { impl['a, Tag, G: Generation] Keys<'a, Tag, G> => Key<Tag, G> }

/// Returned by [`DenseSlotMap::entries`]
pub struct Entries<'a, T, Tag, G>(
    core::iter::Zip<core::iter::Copied<core::slice::Iter<'a, Key<Tag, G>>>, core::slice::Iter<'a, T>>,
);

forward_iterator! { impl['a, T, Tag, G: Generation] Entries<'a, T, Tag, G> => (Key<Tag, G>, &'a T) }

/// Returned by [`DenseSlotMap::entries_mut`]
pub struct EntriesMut<'a, T, Tag, G>(
    core::iter::Zip<core::iter::Copied<core::slice::Iter<'a, Key<Tag, G>>>, core::slice::IterMut<'a, T>>,
);

forward_iterator! { impl['a, T, Tag, G: Generation] EntriesMut<'a, T, Tag, G> => (Key<Tag, G>, &'a mut T) }

/// Returned by [`DenseSlotMap::into_entries`]
pub struct IntoEntries<T, Tag, G>(core::iter::Zip<std::vec::IntoIter<Key<Tag, G>>, std::vec::IntoIter<T>>);

forward_iterator! { impl[T, Tag, G: Generation] IntoEntries<T, Tag, G> => (Key<Tag, G>, T) }

/// Returned by [`DenseSlotMap::drain`]
pub struct Drain<'a, T, Tag, G: Generation> {
    map: &'a mut DenseSlotMap<T, Tag, G>,
}

impl<T, Tag, G: Generation> Drop for Drain<'_, T, Tag, G> {
    fn drop(&mut self) { self.for_each(drop); }
}

impl<T, Tag, G: Generation> Iterator for Drain<'_, T, Tag, G> {
    type Item = (Key<Tag, G>, T);

    fn next(&mut self) -> Option<Self::Item> {
        let key = *self.map.keys.last()?;
        self.map.pop(key).map(|value| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.map.len();
        (len, Some(len))
    }
}

impl<T, Tag, G: Generation> DoubleEndedIterator for Drain<'_, T, Tag, G> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let key = *self.map.keys.first()?;
        self.map.pop(key).map(|value| (key, value))
    }
}

impl<T, Tag, G: Generation> ExactSizeIterator for Drain<'_, T, Tag, G> {}
impl<T, Tag, G: Generation> FusedIterator for Drain<'_, T, Tag, G> {}
