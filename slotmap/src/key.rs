use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use crate::generation::Generation;

/// A key into a [`DenseSlotMap`](crate::DenseSlotMap)
///
/// A key names a slot by `index`, and a single occupancy of that slot by
/// `generation`. It stays valid until the value it was returned for is
/// removed, and is rejected (never silently redirected) after that.
///
/// The `Tag` parameter only exists at compile time, it keeps keys of logically
/// distinct maps from being mixed up. See [`tagged!`](crate::tagged).
pub struct Key<Tag = (), G = u32> {
    index: usize,
    generation: G,
    tag: PhantomData<fn() -> Tag>,
}

impl<Tag, G> Key<Tag, G> {
    /// Create a new key from an index and generation
    pub const fn new(index: usize, generation: G) -> Self {
        Self {
            index,
            generation,
            tag: PhantomData,
        }
    }

    /// The slot index of the given key
    pub const fn index(&self) -> usize { self.index }

    /// The generation of the given key
    pub const fn generation(&self) -> &G { &self.generation }
}

impl<Tag, G: Copy> Clone for Key<Tag, G> {
    fn clone(&self) -> Self { *self }
}

impl<Tag, G: Copy> Copy for Key<Tag, G> {}

impl<Tag, G: PartialEq> PartialEq for Key<Tag, G> {
    fn eq(&self, other: &Self) -> bool { self.index == other.index && self.generation == other.generation }
}

impl<Tag, G: Eq> Eq for Key<Tag, G> {}

impl<Tag, G: PartialOrd> PartialOrd for Key<Tag, G> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.index.cmp(&other.index) {
            Ordering::Equal => self.generation.partial_cmp(&other.generation),
            ordering => Some(ordering),
        }
    }
}

impl<Tag, G: Ord> Ord for Key<Tag, G> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index
            .cmp(&other.index)
            .then_with(|| self.generation.cmp(&other.generation))
    }
}

impl<Tag, G: Hash> Hash for Key<Tag, G> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<Tag, G: fmt::Debug> fmt::Debug for Key<Tag, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("index", &self.index)
            .field("generation", &self.generation)
            .finish()
    }
}

/// An entry in the sparse slot table
///
/// When occupied, `payload` is the position of the value in dense storage.
/// When vacant, it links to the next vacant slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot<G> {
    pub(crate) payload: usize,
    pub(crate) generation: G,
}

impl<G: Generation> Slot<G> {
    /// The reserved slot at index 0, it is never occupied
    pub(crate) const SENTINEL: Self = Self {
        payload: 0,
        generation: G::VACANT,
    };

    pub(crate) fn is_occupied(&self) -> bool { self.generation.is_occupied() }

    /// Check if the saved generation matches the current occupant
    ///
    /// This can only be true if the slot is occupied
    pub(crate) fn matches(&self, generation: G) -> bool { self.is_occupied() && self.generation == generation }
}

#[cfg(test)]
mod test {
    use super::*;

    enum Red {}
    enum Blue {}

    #[test]
    fn equality_needs_both_fields() {
        let a = Key::<(), u32>::new(1, 1);
        assert_eq!(a, Key::new(1, 1));
        assert_ne!(a, Key::new(1, 3));
        assert_ne!(a, Key::new(2, 1));
    }

    #[test]
    fn ordering_is_index_then_generation() {
        let a = Key::<(), u32>::new(1, 5);
        let b = Key::<(), u32>::new(2, 1);
        let c = Key::<(), u32>::new(2, 3);
        assert!(a < b);
        assert!(b < c);
        assert_eq!(c.cmp(&c), Ordering::Equal);
    }

    #[test]
    fn tags_need_no_bounds() {
        // neither tag implements any trait, but keys are still `Copy + Eq`
        let red = Key::<Red, u8>::new(3, 1);
        let copy = red;
        assert_eq!(red, copy);

        let blue = Key::<Blue, u8>::new(3, 1);
        assert_eq!(blue.index(), red.index());
        assert_eq!(blue.generation(), red.generation());
    }

    #[test]
    fn sentinel_never_matches() {
        let slot = Slot::<u32>::SENTINEL;
        assert!(!slot.is_occupied());
        assert!(!slot.matches(0));

        let slot = Slot { payload: 4, generation: 3u32 };
        assert!(slot.matches(3));
        assert!(!slot.matches(1));
    }
}
