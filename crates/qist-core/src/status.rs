//! Guarded status workflows for entities with a finite status field.
//!
//! Each status type declares at most one successor. A transition is valid
//! only when the target is exactly that successor; terminal states accept
//! nothing.
use crate::{
    db::{EntityStore, StoreError},
    obs::sink::{self, MetricsEvent},
    traits::EntityKind,
    types::EntityId,
};
use std::fmt::{Debug, Display};
use thiserror::Error as ThisError;
use tracing::warn;

///
/// Status
///

pub trait Status: Copy + Debug + Display + Eq + 'static {
    /// The single allowed next state, if any.
    fn successor(self) -> Option<Self>;

    fn is_terminal(self) -> bool {
        self.successor().is_none()
    }

    fn can_transition_to(self, target: Self) -> bool {
        self.successor() == Some(target)
    }
}

///
/// StatusEntity
/// Entity carrying a [`Status`] field that can be patched on its own.
///

pub trait StatusEntity: EntityKind {
    type Status: Status;

    fn status(&self) -> Self::Status;

    /// Patch that changes only the status field.
    fn status_update(status: Self::Status) -> Self::Update;
}

///
/// TransitionError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TransitionError {
    #[error("invalid {entity} transition for {id}: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        id: EntityId,
        from: String,
        to: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

///
/// UnknownStatus
/// Text that names no state of the status type it was parsed as.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("unknown status: '{0}'")]
pub struct UnknownStatus(pub String);

/// Check a transition without touching any store.
pub fn check_transition<E: StatusEntity>(
    entity: &E,
    target: E::Status,
) -> Result<(), TransitionError> {
    if entity.status().can_transition_to(target) {
        Ok(())
    } else {
        Err(reject(entity, target))
    }
}

// Record and log a rejected transition, returning the error to surface.
fn reject<E: StatusEntity>(entity: &E, target: E::Status) -> TransitionError {
    let from = entity.status();

    sink::record(MetricsEvent::InvalidTransition {
        entity_path: E::PATH,
    });
    warn!(
        entity = E::ENTITY_NAME,
        id = %entity.id(),
        %from,
        to = %target,
        "rejected status transition"
    );

    TransitionError::InvalidTransition {
        entity: E::ENTITY_NAME,
        id: entity.id(),
        from: from.to_string(),
        to: target.to_string(),
    }
}

impl<E: StatusEntity> EntityStore<E> {
    /// Move the row with `id` to `target`, writing through `update`.
    pub fn transition(&mut self, id: EntityId, target: E::Status) -> Result<E, TransitionError> {
        let current = self.get(id).ok_or(StoreError::NotFound {
            entity: E::ENTITY_NAME,
            id,
        })?;
        check_transition(current, target)?;

        let next = self.update(id, E::status_update(target))?;
        sink::record(MetricsEvent::Transition {
            entity_path: E::PATH,
        });

        Ok(next)
    }

    /// Move the row with `id` to its successor state.
    pub fn advance(&mut self, id: EntityId) -> Result<E, TransitionError> {
        let current = self.get(id).ok_or(StoreError::NotFound {
            entity: E::ENTITY_NAME,
            id,
        })?;
        let from = current.status();

        match from.successor() {
            Some(target) => self.transition(id, target),
            None => Err(reject(current, from)),
        }
    }

    /// Number of rows currently in `status`.
    #[must_use]
    pub fn count_in(&self, status: E::Status) -> usize {
        self.iter().filter(|row| row.status() == status).count()
    }
}

///
/// TESTS
///
