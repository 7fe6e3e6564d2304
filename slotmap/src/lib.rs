#![no_std]
#![forbid(missing_docs)]
#![forbid(unsafe_code)]

//! A dense slot map: stable, generation-checked keys into values that are
//! kept packed in one contiguous allocation.
//!
//! Keys act like pointers into the map that can't dangle. Once the value a key
//! was issued for is removed, the key is rejected, even if its slot has since
//! been reused for another value.
//!
//! ```
//! use dense_slotmap::DenseSlotMap;
//!
//! let mut map = DenseSlotMap::new();
//! let apple = map.insert("Apple");
//! let banana = map.insert("Banana");
//!
//! assert_eq!(map.pop(apple), Some("Apple"));
//! assert_eq!(map.get(apple), None);
//! assert_eq!(map[banana], "Banana");
//! assert_eq!(map.len(), 1);
//! ```
//!
//! This crate is heavily inspired by crates like [`slotmap`](https://crates.io/crates/slotmap)
//! and [`pui-arena`](https://crates.io/crates/pui-arena).

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        extern crate std;
    } else {
        extern crate alloc as std;
    }
}

pub mod dense;
mod error;
pub mod generation;
mod key;

pub use dense::DenseSlotMap;
pub use error::KeyError;
pub use generation::Generation;
pub use key::Key;

/// Declare a module holding a tagged [`DenseSlotMap`] and its [`Key`]
///
/// Keys from maps with different tags are different types, so passing a key
/// to the wrong map is a compile error rather than a runtime lookup failure.
///
/// The generated module contains an uninhabited `Tag`, a `Key` alias and a
/// `SlotMap<T>` alias. The generation defaults to `u32`, and can be overridden
/// with a `type Generation = ...;` line.
///
/// ```
/// dense_slotmap::tagged! {
///     /// enemies in the level
///     pub mod enemies;
/// }
///
/// dense_slotmap::tagged! {
///     /// short lived particles
///     mod particles;
///     type Generation = u16;
/// }
///
/// let mut enemies = enemies::SlotMap::tagged();
/// let mut particles = particles::SlotMap::tagged();
///
/// let goblin: enemies::Key = enemies.insert("goblin");
/// let spark: particles::Key = particles.insert(0.5);
///
/// assert_eq!(enemies[goblin], "goblin");
/// assert_eq!(particles[spark], 0.5);
/// ```
///
/// ```compile_fail
/// dense_slotmap::tagged! { mod enemies; }
/// dense_slotmap::tagged! { mod items; }
///
/// let mut enemies = enemies::SlotMap::tagged();
/// let items = items::SlotMap::<&str>::tagged();
///
/// let goblin = enemies.insert("goblin");
/// items.get(goblin);
/// ```
#[macro_export]
macro_rules! tagged {
    (
        $(#[$meta:meta])*
        $vis:vis mod $name:ident;
        $(type Generation = $generation:ty;)?
    ) => {
        $crate::__tagged! {
            @build_module
            ($(#[$meta])*) ($vis) $name,
            $($generation,)? u32
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __tagged {
    (
        @build_module
        ($(#[$meta:meta])*) ($vis:vis) $name:ident,
        $generation:ty $(, $default:ty)?
    ) => {
        $(#[$meta])*
        $vis mod $name {
            /// The tag for [`Key`] and [`SlotMap`], it has no values
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
            pub enum Tag {}

            /// The generation for [`Key`] and [`SlotMap`]
            pub type Generation = $generation;

            /// The key for [`SlotMap`]
            pub type Key = $crate::Key<Tag, Generation>;

            /// A slot map that only accepts [`Key`]
            pub type SlotMap<T> = $crate::DenseSlotMap<T, Tag, Generation>;
        }
    };
}
