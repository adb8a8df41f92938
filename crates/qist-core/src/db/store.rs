use crate::{
    db::StoreError,
    obs::sink::{self, MetricsEvent},
    traits::EntityKind,
    types::EntityId,
};
use serde::{Deserialize, Serialize};
use std::slice;
use tracing::debug;

///
/// IdStrategy
///
/// How a store picks the id for a new row.
///
/// - `Monotonic` (default): one past the largest id this store has ever
///   held. Ids are never reused, even after deletes.
/// - `MaxPlusOne`: one past the largest id currently present (`1` when
///   empty). Deleting the top row frees its id for reuse. Kept for
///   compatibility with data created under that rule.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    #[default]
    Monotonic,
    MaxPlusOne,
}

///
/// EntityStore
///
/// Authoritative in-memory collection for one entity type and the only
/// sanctioned mutation point for it.
///
/// Rows keep insertion order. Ids are unique within the store.
/// All calls are synchronous; there is exactly one writer.
///

#[derive(Clone, Debug)]
pub struct EntityStore<E: EntityKind> {
    rows: Vec<E>,
    strategy: IdStrategy,
    high_water: u64,
}

impl<E: EntityKind> EntityStore<E> {
    // ======================================================================
    // Construction
    // ======================================================================

    #[must_use]
    pub const fn new(strategy: IdStrategy) -> Self {
        Self {
            rows: Vec::new(),
            strategy,
            high_water: 0,
        }
    }

    /// Build a store from fixture rows, rejecting duplicate ids.
    pub fn seeded(
        rows: impl IntoIterator<Item = E>,
        strategy: IdStrategy,
    ) -> Result<Self, StoreError> {
        let mut store = Self::new(strategy);

        for row in rows {
            let id = row.id();
            if store.contains(id) {
                return Err(StoreError::DuplicateId {
                    entity: E::ENTITY_NAME,
                    id,
                });
            }
            store.high_water = store.high_water.max(id.get());
            store.rows.push(row);
        }

        debug!(
            entity = E::ENTITY_NAME,
            rows = store.rows.len(),
            "seeded store"
        );

        Ok(store)
    }

    // ======================================================================
    // Reads
    // ======================================================================

    /// Current contents in insertion order.
    #[must_use]
    pub fn list(&self) -> &[E] {
        &self.rows
    }

    pub fn iter(&self) -> slice::Iter<'_, E> {
        self.rows.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.rows.iter().find(|row| row.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    #[must_use]
    pub const fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    /// Id the next `create` will assign.
    ///
    /// Fails once the largest id in play is `u64::MAX`; an id already
    /// present is never handed out again.
    pub fn next_id(&self) -> Result<EntityId, StoreError> {
        let current_max = self.rows.iter().map(|row| row.id().get()).max();
        let base = match self.strategy {
            IdStrategy::MaxPlusOne => current_max.unwrap_or(0),
            IdStrategy::Monotonic => current_max.unwrap_or(0).max(self.high_water),
        };

        base.checked_add(1)
            .and_then(|next| EntityId::new(next).ok())
            .ok_or(StoreError::IdSpaceExhausted {
                entity: E::ENTITY_NAME,
            })
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    // ======================================================================
    // Writes
    // ======================================================================

    /// Assign an id, append, and return the created row.
    ///
    /// Only fails when the id space is exhausted. Structural checks
    /// (required fields, non-empty images) happen upstream in the form layer.
    pub fn create(&mut self, create: E::Create) -> Result<E, StoreError> {
        let id = self.next_id()?;
        let row = E::from_create(id, create);

        self.high_water = self.high_water.max(id.get());
        self.rows.push(row.clone());

        sink::record(MetricsEvent::Create {
            entity_path: E::PATH,
        });
        debug!(entity = E::ENTITY_NAME, %id, "created");

        Ok(row)
    }

    /// Merge `update` into the row with `id` and return the merged row.
    pub fn update(&mut self, id: EntityId, update: E::Update) -> Result<E, StoreError> {
        let Some(index) = self.position(id) else {
            return Err(StoreError::NotFound {
                entity: E::ENTITY_NAME,
                id,
            });
        };

        // Immutable by replacement: merge into a copy, then swap it in.
        let mut next = self.rows[index].clone();
        next.merge(update);
        debug_assert_eq!(next.id(), id, "merge must not change the row id");
        self.rows[index] = next.clone();

        sink::record(MetricsEvent::Update {
            entity_path: E::PATH,
        });
        debug!(entity = E::ENTITY_NAME, %id, "updated");

        Ok(next)
    }

    /// Remove the row with `id`. Absent ids are a no-op.
    pub fn remove(&mut self, id: EntityId) -> Option<E> {
        let removed = self.position(id).map(|index| self.rows.remove(index));

        sink::record(MetricsEvent::Remove {
            entity_path: E::PATH,
            existed: removed.is_some(),
        });
        debug!(
            entity = E::ENTITY_NAME,
            %id,
            existed = removed.is_some(),
            "removed"
        );

        removed
    }

    /// Remove the row with `id` only if `confirm` approves it.
    ///
    /// `confirm` is not consulted when the id is absent.
    pub fn remove_confirmed(
        &mut self,
        id: EntityId,
        confirm: impl FnOnce(&E) -> bool,
    ) -> Option<E> {
        let row = self.get(id)?;
        if !confirm(row) {
            debug!(entity = E::ENTITY_NAME, %id, "remove declined");
            return None;
        }

        self.remove(id)
    }
}

impl<E: EntityKind> Default for EntityStore<E> {
    fn default() -> Self {
        Self::new(IdStrategy::default())
    }
}

impl<'a, E: EntityKind> IntoIterator for &'a EntityStore<E> {
    type Item = &'a E;
    type IntoIter = slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

///
/// TESTS
///
