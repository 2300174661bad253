//! Typed Entity IDs
//!
//! UUID-backed identifiers with a phantom marker per entity, so an id of
//! one entity cannot be passed where another is expected.

use std::fmt;
use std::marker::PhantomData;

use uuid::Uuid;

/// Generic typed ID wrapper
///
/// ## Examples
/// ```rust
/// use kernel::id::{Id, markers};
///
/// type CodeId = Id<markers::Code>;
/// let id = CodeId::new();
/// assert_eq!(id, CodeId::from_uuid(id.into_uuid()));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: Uuid,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Draw a fresh random ID (UUID v4)
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an existing UUID, as read from storage
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            value: uuid,
            _marker: PhantomData,
        }
    }

    /// Borrow the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.value
    }

    /// Unwrap into the underlying UUID, for binding to queries
    pub fn into_uuid(self) -> Uuid {
        self.value
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<Uuid> for Id<T> {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl<T> From<Id<T>> for Uuid {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

/// Phantom markers, one per identified entity
pub mod markers {
    /// Marker for reward code IDs
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Code;
}

/// Reward code identifier
pub type CodeId = Id<markers::Code>;
