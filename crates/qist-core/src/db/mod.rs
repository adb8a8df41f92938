mod filter;
mod store;

pub use filter::{ViewFilter, apply_filter};
pub use store::{EntityStore, IdStrategy};

use crate::types::EntityId;
use thiserror::Error as ThisError;

///
/// StoreError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("duplicate {entity} id: {id}")]
    DuplicateId { entity: &'static str, id: EntityId },

    #[error("{entity} id space exhausted")]
    IdSpaceExhausted { entity: &'static str },
}
