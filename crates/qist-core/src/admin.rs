//! The admin console context: every entity store, the session, and the
//! configuration they were built from, passed explicitly to callers.
use crate::{
    config::AdminConfig,
    dashboard::{DashboardSummary, ListingCounts},
    db::{EntityStore, StoreError, ViewFilter},
    error::InternalError,
    fixtures,
    form::FormBinding,
    model::{
        branch::Branch,
        cart::{Cart, CartStatus},
        installment_plan::InstallmentPlan,
        product::Product,
        query::{Query, QueryStatus},
    },
    obs::{MetricsSink, with_metrics_sink},
    session::{Session, SessionStorage},
    status::StatusEntity,
    traits::{EntityKind, Searchable},
    types::EntityId,
};
use std::rc::Rc;

///
/// Stores
/// One store per collection.
///

#[derive(Clone, Debug, Default)]
pub struct Stores {
    pub products: EntityStore<Product>,
    pub installment_plans: EntityStore<InstallmentPlan>,
    pub carts: EntityStore<Cart>,
    pub queries: EntityStore<Query>,
    pub branches: EntityStore<Branch>,
}

///
/// Collection
/// Routes an entity type to its store inside [`Stores`].
///

pub trait Collection: EntityKind + Searchable {
    fn store(stores: &Stores) -> &EntityStore<Self>;

    fn store_mut(stores: &mut Stores) -> &mut EntityStore<Self>;
}

macro_rules! impl_collection {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(
            impl Collection for $ty {
                fn store(stores: &Stores) -> &EntityStore<Self> {
                    &stores.$field
                }

                fn store_mut(stores: &mut Stores) -> &mut EntityStore<Self> {
                    &mut stores.$field
                }
            }
        )*
    };
}

impl_collection! {
    Product => products,
    InstallmentPlan => installment_plans,
    Cart => carts,
    Query => queries,
    Branch => branches,
}

///
/// Admin
///
/// Session-scoped console handle. Reads go straight to the stores; writes
/// run under the optional metrics sink override.
///

pub struct Admin<S: SessionStorage> {
    stores: Stores,
    session: Session<S>,
    config: AdminConfig,
    metrics: Option<Rc<dyn MetricsSink>>,
}

impl<S: SessionStorage> Admin<S> {
    // ---------------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------------

    /// Empty stores and a session hydrated from `storage`.
    pub fn new(config: AdminConfig, storage: S) -> Result<Self, InternalError> {
        let strategy = config.id_strategy;
        let stores = Stores {
            products: EntityStore::new(strategy),
            installment_plans: EntityStore::new(strategy),
            carts: EntityStore::new(strategy),
            queries: EntityStore::new(strategy),
            branches: EntityStore::new(strategy),
        };

        Self::with_stores(config, storage, stores)
    }

    /// Stores seeded from [`fixtures`].
    pub fn seeded(config: AdminConfig, storage: S) -> Result<Self, InternalError> {
        let strategy = config.id_strategy;
        let stores = Stores {
            products: EntityStore::seeded(fixtures::products(), strategy)?,
            installment_plans: EntityStore::seeded(fixtures::installment_plans(), strategy)?,
            carts: EntityStore::seeded(fixtures::carts(), strategy)?,
            queries: EntityStore::seeded(fixtures::queries(), strategy)?,
            branches: EntityStore::seeded(fixtures::branches(), strategy)?,
        };

        Self::with_stores(config, storage, stores)
    }

    fn with_stores(config: AdminConfig, storage: S, stores: Stores) -> Result<Self, InternalError> {
        let session = Session::hydrate(storage, &config.session)?;

        Ok(Self {
            stores,
            session,
            config,
            metrics: None,
        })
    }

    /// Route write metrics to `sink` instead of the global counters.
    #[must_use]
    pub fn metrics_sink(mut self, sink: Rc<dyn MetricsSink>) -> Self {
        self.metrics = Some(sink);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &AdminConfig {
        &self.config
    }

    #[must_use]
    pub const fn session(&self) -> &Session<S> {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut Session<S> {
        &mut self.session
    }

    #[must_use]
    pub const fn stores(&self) -> &Stores {
        &self.stores
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn store<E: Collection>(&self) -> &EntityStore<E> {
        E::store(&self.stores)
    }

    #[must_use]
    pub fn get<E: Collection>(&self, id: EntityId) -> Option<&E> {
        self.store::<E>().get(id)
    }

    /// Rows of `E` whose default search fields contain `query`.
    #[must_use]
    pub fn list<E: Collection>(&self, query: &str) -> Vec<&E> {
        ViewFilter::for_entity::<E>(query).apply(self.store::<E>())
    }

    /// Names of the plans `product` offers, in plan-store order.
    /// Ids with no matching plan are skipped.
    #[must_use]
    pub fn plan_names(&self, product: &Product) -> Vec<&str> {
        self.stores
            .installment_plans
            .iter()
            .filter(|plan| product.offers_plan(plan.id))
            .map(|plan| plan.name.as_str())
            .collect()
    }

    #[must_use]
    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary::compute(self.stores.products.list(), self.stores.carts.list())
    }

    /// Visible and pending carts for `query`.
    #[must_use]
    pub fn pending_count(&self, query: &str) -> ListingCounts {
        ListingCounts::carts(self.stores.carts.list(), query)
    }

    /// Visible and open queries for `query`.
    #[must_use]
    pub fn open_count(&self, query: &str) -> ListingCounts {
        ListingCounts::queries(self.stores.queries.list(), query)
    }

    // ---------------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------------

    /// Draft for a new row, or for the existing row with `id`.
    pub fn open<F>(&self, id: Option<EntityId>) -> Result<F, InternalError>
    where
        F: FormBinding,
        F::Entity: Collection,
    {
        let Some(id) = id else {
            return Ok(F::open(None));
        };

        let row = self.get::<F::Entity>(id).ok_or(StoreError::NotFound {
            entity: <F::Entity as EntityKind>::ENTITY_NAME,
            id,
        })?;

        Ok(F::open(Some(row)))
    }

    /// Validate and commit `draft` to its store.
    pub fn save<F>(&mut self, draft: &F) -> Result<F::Entity, InternalError>
    where
        F: FormBinding,
        F::Entity: Collection,
    {
        let store = <F::Entity as Collection>::store_mut(&mut self.stores);

        Ok(scoped(self.metrics.clone(), || draft.submit(store))?)
    }

    /// Remove the row with `id` if `confirm` approves it.
    ///
    /// `confirm` is only asked about rows that exist.
    pub fn delete<E: Collection>(
        &mut self,
        id: EntityId,
        confirm: impl FnOnce(&E) -> bool,
    ) -> Option<E> {
        let store = E::store_mut(&mut self.stores);

        scoped(self.metrics.clone(), || store.remove_confirmed(id, confirm))
    }

    /// Move a status-bearing row to `target`.
    pub fn transition<E>(&mut self, id: EntityId, target: E::Status) -> Result<E, InternalError>
    where
        E: Collection + StatusEntity,
    {
        let store = E::store_mut(&mut self.stores);

        Ok(scoped(self.metrics.clone(), || store.transition(id, target))?)
    }

    pub fn process_cart(&mut self, id: EntityId) -> Result<Cart, InternalError> {
        self.transition::<Cart>(id, CartStatus::Processed)
    }

    pub fn resolve_query(&mut self, id: EntityId) -> Result<Query, InternalError> {
        self.transition::<Query>(id, QueryStatus::Resolved)
    }
}

// Run `f` under `sink` when one is installed.
fn scoped<T>(sink: Option<Rc<dyn MetricsSink>>, f: impl FnOnce() -> T) -> T {
    match sink {
        Some(sink) => with_metrics_sink(sink, f),
        None => f(),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorClass,
        form::{BranchDraft, ProductDraft},
        obs::MetricsEvent,
        session::MemoryStorage,
        traits::Path,
    };
    use std::cell::RefCell;

    fn admin() -> Admin<MemoryStorage> {
        Admin::seeded(AdminConfig::default(), MemoryStorage::default()).unwrap()
    }

    fn id(n: u64) -> EntityId {
        EntityId::new(n).unwrap()
    }

    #[derive(Default)]
    struct Recorder(RefCell<Vec<MetricsEvent>>);

    impl MetricsSink for Recorder {
        fn record(&self, event: MetricsEvent) {
            self.0.borrow_mut().push(event);
        }
    }

    #[test]
    fn seeded_console_matches_fixtures() {
        let admin = admin();

        assert_eq!(admin.store::<Product>().len(), 5);
        assert_eq!(admin.store::<Branch>().len(), 3);
        assert_eq!(admin.list::<Product>("lap").len(), 1);
        assert_eq!(admin.summary().active_carts, 2);
    }

    #[test]
    fn plan_names_follow_plan_order_and_skip_dangling_ids() {
        let mut admin = admin();
        let laptop = admin.get::<Product>(id(1)).unwrap().clone();
        assert_eq!(
            admin.plan_names(&laptop),
            ["3 Month Plan", "6 Month Plan", "12 Month Plan"]
        );

        admin.delete::<InstallmentPlan>(id(2), |_| true);

        assert_eq!(admin.plan_names(&laptop), ["3 Month Plan", "12 Month Plan"]);
    }

    #[test]
    fn open_for_a_missing_row_is_not_found() {
        let admin = admin();

        let err = admin.open::<BranchDraft>(Some(id(42))).err().unwrap();

        assert_eq!(err.class, ErrorClass::NotFound);
    }

    #[test]
    fn save_edits_through_the_draft() {
        let mut admin = admin();

        let mut draft: BranchDraft = admin.open(Some(id(2))).unwrap();
        draft.set_field("phone", "+966-13-0000000").unwrap();
        let branch = admin.save(&draft).unwrap();

        assert_eq!(branch.id, 2);
        assert_eq!(admin.get::<Branch>(id(2)).unwrap().phone, "+966-13-0000000");
    }

    #[test]
    fn invalid_save_is_a_validation_error() {
        let mut admin = admin();
        let draft: ProductDraft = admin.open(None).unwrap();

        let err = admin.save(&draft).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(admin.store::<Product>().len(), 5);
    }

    #[test]
    fn declined_delete_keeps_the_row() {
        let mut admin = admin();

        assert!(admin.delete::<Cart>(id(1), |_| false).is_none());
        assert!(admin.get::<Cart>(id(1)).is_some());

        let removed = admin.delete::<Cart>(id(1), |cart| cart.user_name == "Ahmed Hassan");
        assert!(removed.is_some());
        assert!(admin.get::<Cart>(id(1)).is_none());
    }

    #[test]
    fn status_actions_and_metrics_sink() {
        let recorder = Rc::new(Recorder::default());
        let mut admin = admin().metrics_sink(recorder.clone());

        admin.process_cart(id(1)).unwrap();
        let err = admin.process_cart(id(2)).unwrap_err();
        assert_eq!(err.class, ErrorClass::InvalidTransition);
        admin.resolve_query(id(3)).unwrap();

        let events = recorder.0.borrow();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, MetricsEvent::Transition { .. }))
                .count(),
            2
        );
        assert!(events
            .iter()
            .any(|e| matches!(e, MetricsEvent::InvalidTransition { entity_path } if *entity_path == Cart::PATH)));
        assert_eq!(admin.open_count("").flagged, 1);
        assert_eq!(admin.pending_count("").flagged, 1);
    }
}
