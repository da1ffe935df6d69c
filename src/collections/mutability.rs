//! collections::mutability — type-level mutable / immutable access modes.
//!
//! Every collection type is generic over a [`Mutability`] marker. The marker
//! set is sealed: [`Mutable`] and [`Immutable`] are the only modes, so
//! "assign once" is part of the type rather than a runtime flag.
//! `to_mutable()` / `to_immutable()` move between the two by rebuilding the
//! collection, never by casting.

mod sealed {
    pub trait Sealed {}
}

/// Access mode of a collection.
pub trait Mutability:
    sealed::Sealed + Copy + Clone + Default + PartialEq + Eq + std::fmt::Debug + 'static
{
    /// Whether values may change after construction.
    const MUTABLE: bool;
}

/// Writable collections: setters, `convert_to_*` and `remove` succeed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Mutable;

/// Read-only collections: values are assigned once at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Immutable;

impl sealed::Sealed for Mutable {}
impl sealed::Sealed for Immutable {}

impl Mutability for Mutable {
    const MUTABLE: bool = true;
}

impl Mutability for Immutable {
    const MUTABLE: bool = false;
}
