//! The generation counters stored in each slot, see [`Generation`] for details

use core::{fmt::Debug, hash::Hash};

/// A per-slot counter that tells successive occupants of a slot apart
///
/// The parity of a generation encodes the state of its slot: an even generation
/// is a vacant slot, an odd generation is an occupied one. A slot's generation
/// only ever increases, so a [`Key`](crate::Key) saved during one occupancy can
/// never match a later occupancy of the same slot.
///
/// # Slot Exhaustion
///
/// Generations are finite. Rather than wrapping around (and letting a stale key
/// alias a fresh value), a slot whose generation can't be advanced past another
/// full occupy/vacate cycle is *retired*: it stays vacant and is never handed out
/// again. For the default `u32` this takes 2^31 - 1 insertion/removal pairs *per slot*,
/// so it shouldn't be an issue. For `u8` each slot retires after 127 pairs.
pub trait Generation: Copy + Eq + Ord + Hash + Debug {
    /// The generation of a slot that has never been occupied
    const VACANT: Self;

    /// Check if this generation marks an occupied slot
    fn is_occupied(self) -> bool;

    /// Check if this generation marks a vacant slot
    fn is_vacant(self) -> bool { !self.is_occupied() }

    /// The generation a slot takes when a value is put into it
    ///
    /// Vacant generations advance by one, an already occupied generation is
    /// returned unchanged.
    fn occupy(self) -> Self;

    /// The generation a slot takes when its value is removed
    ///
    /// returns `Err` if the slot has exhausted its generations, and must not be
    /// occupied again. Either way the returned generation is vacant.
    fn vacate(self) -> Result<Self, Self>;

    /// Check if a vacant slot has run out of generations
    fn is_exhausted(self) -> bool;
}

macro_rules! unsigned_generation {
    ($($ty:ty),* $(,)?) => {$(
        impl Generation for $ty {
            const VACANT: Self = 0;

            #[inline]
            fn is_occupied(self) -> bool { self & 1 == 1 }

            #[inline]
            fn occupy(self) -> Self { self | 1 }

            #[inline]
            fn vacate(self) -> Result<Self, Self> {
                const LAST: $ty = <$ty>::MAX - 1;

                match self.checked_add(1) {
                    Some(next) if next & 1 == 0 && next < LAST => Ok(next),
                    _ => Err(LAST),
                }
            }

            #[inline]
            fn is_exhausted(self) -> bool { self == <$ty>::MAX - 1 }
        }
    )*};
}

unsigned_generation!(u8, u16, u32, u64);
