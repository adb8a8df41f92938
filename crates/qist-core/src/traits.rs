use crate::types::EntityId;
use std::fmt::Debug;

// ============================================================================
// FOUNDATIONAL KINDS
// ============================================================================

///
/// Path
/// Fully-qualified entity path, used as the metrics and log key.
///

pub trait Path {
    const PATH: &'static str;
}

// ============================================================================
// ENTITY CONTRACT
// ============================================================================

///
/// EntityKind
///
/// A record held in an [`EntityStore`](crate::db::EntityStore).
///
/// ## Semantics
/// - `Create` is the entity minus its id; the store assigns the id.
/// - `Update` is the partial form of the entity. `Update::default()` must be
///   the empty patch, and merging it must leave every field unchanged.
/// - Entities are immutable by replacement: `merge` produces the next value
///   of a row, the store swaps it in.
///

pub trait EntityKind: Path + Clone + Debug + 'static {
    const ENTITY_NAME: &'static str;

    /// Payload accepted when creating this entity.
    type Create;

    /// Payload accepted when updating this entity.
    type Update: Default;

    fn id(&self) -> EntityId;

    fn from_create(id: EntityId, create: Self::Create) -> Self;

    /// Merge the update payload into self.
    fn merge(&mut self, update: Self::Update);
}

// ============================================================================
// DERIVED VIEWS
// ============================================================================

///
/// FieldValues
///
/// Exposes string-valued fields by name so filters can run without knowing
/// the concrete entity type. Unknown names and non-text fields yield `None`.
///

pub trait FieldValues {
    fn text_field(&self, name: &str) -> Option<&str>;
}

///
/// Searchable
/// Entities with a default set of free-text search fields.
///

pub trait Searchable: FieldValues {
    const SEARCH_FIELDS: &'static [&'static str];
}

// Implements `Path` with a crate-qualified path.
macro_rules! impl_path {
    ($ty:ty, $name:literal) => {
        impl $crate::traits::Path for $ty {
            const PATH: &'static str = concat!("qist::model::", $name);
        }
    };
}

pub(crate) use impl_path;
