//! End-to-end behaviour of stores, filters, drafts and status workflows over
//! the public API.

use proptest::prelude::*;
use qist_core::{
    db::{EntityStore, IdStrategy, ViewFilter, apply_filter},
    fixtures,
    form::{FormBinding, ProductDraft, commit},
    model::{
        cart::{Cart, CartStatus},
        product::{Product, ProductCreate, ProductUpdate},
    },
    obs::{metrics_report, metrics_reset_all},
    status::TransitionError,
    types::{EntityId, Timestamp},
};

fn id(n: u64) -> EntityId {
    EntityId::new(n).unwrap()
}

fn product(name: &str) -> ProductCreate {
    ProductCreate {
        name: name.to_string(),
        price: 10.0,
        category: "Accessories".to_string(),
        brand: "HP".to_string(),
        images: vec!["/products/hub-product.jpg".to_string()],
        available_installment_plan_ids: vec![id(1)],
        date_added: Timestamp::from_seconds(1_735_776_000),
    }
}

fn seeded_pair(strategy: IdStrategy) -> EntityStore<Product> {
    let rows = fixtures::products().into_iter().take(2);

    EntityStore::seeded(rows, strategy).unwrap()
}

// ---------------------------------------------------------------------------
// Id assignment
// ---------------------------------------------------------------------------

#[test]
fn max_plus_one_assigns_past_the_current_maximum() {
    let mut store = seeded_pair(IdStrategy::MaxPlusOne);

    assert_eq!(store.create(product("X")).unwrap().id, "3");
    store.remove(id(2));
    assert_eq!(store.create(product("Y")).unwrap().id, "4");
}

#[test]
fn max_plus_one_reuses_the_id_of_a_deleted_top_row() {
    let mut store = seeded_pair(IdStrategy::MaxPlusOne);

    store.remove(id(2));

    assert_eq!(store.create(product("Y")).unwrap().id, "2");
}

#[test]
fn monotonic_ids_survive_deleting_the_top_row() {
    let mut store = seeded_pair(IdStrategy::Monotonic);

    store.remove(id(2));

    assert_eq!(store.create(product("Y")).unwrap().id, "3");
}

proptest! {
    #[test]
    fn nth_create_on_an_empty_store_gets_id_n(count in 1usize..40, monotonic in any::<bool>()) {
        let strategy = if monotonic { IdStrategy::Monotonic } else { IdStrategy::MaxPlusOne };
        let mut store = EntityStore::<Product>::new(strategy);

        for n in 1..=count {
            let created = store.create(product("p")).unwrap();
            prop_assert_eq!(created.id.get(), n as u64);
        }
    }

    #[test]
    fn monotonic_ids_are_never_reused(ops in prop::collection::vec(any::<Option<u8>>(), 1..60)) {
        let mut store = EntityStore::<Product>::new(IdStrategy::Monotonic);
        let mut issued = Vec::new();

        for op in ops {
            match op {
                // Remove an arbitrary previously issued id.
                Some(pick) if !issued.is_empty() => {
                    let victim = issued[usize::from(pick) % issued.len()];
                    store.remove(victim);
                }
                _ => {
                    let created = store.create(product("p")).unwrap();
                    prop_assert!(!issued.contains(&created.id));
                    issued.push(created.id);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[test]
fn laptop_is_found_regardless_of_query_case() {
    let products = fixtures::products();

    for query in ["lap", "LAP", "Laptop"] {
        let hits = apply_filter(&products, query, &["name"]);
        assert_eq!(hits.len(), 1, "query {query}");
        assert_eq!(hits[0].name, "Premium Laptop");
    }
}

#[test]
fn empty_query_is_the_identity() {
    let products = fixtures::products();

    let all = ViewFilter::for_entity::<Product>("").apply(&products);

    assert_eq!(all, products.iter().collect::<Vec<_>>());
}

#[test]
fn cart_filter_matches_customer_or_product() {
    let carts = fixtures::carts();

    let by_customer = ViewFilter::for_entity::<Cart>("ahmed").apply(&carts);
    let by_product = ViewFilter::for_entity::<Cart>("headphones").apply(&carts);

    assert_eq!(by_customer.len(), 1);
    assert_eq!(by_product[0].user_name, "Fatima Ali");
}

// ---------------------------------------------------------------------------
// Update and delete idempotence
// ---------------------------------------------------------------------------

#[test]
fn empty_update_changes_nothing() {
    let mut store = seeded_pair(IdStrategy::default());
    let before = store.get(id(1)).cloned().unwrap();

    let after = store.update(id(1), ProductUpdate::default()).unwrap();

    assert_eq!(after, before);
    assert_eq!(store.get(id(1)), Some(&before));
}

#[test]
fn second_remove_is_a_no_op() {
    let mut store = seeded_pair(IdStrategy::default());

    assert!(store.remove(id(1)).is_some());
    let snapshot: Vec<Product> = store.list().to_vec();
    assert!(store.remove(id(1)).is_none());

    assert_eq!(store.list(), snapshot.as_slice());
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

#[test]
fn draft_without_images_never_reaches_the_store() {
    metrics_reset_all();
    let mut store = seeded_pair(IdStrategy::default());

    let mut draft = ProductDraft::open(None);
    draft.set_field("name", "Smart Watch").unwrap();
    draft.set_field("price", "199").unwrap();
    draft.set_field("category", "Electronics").unwrap();
    draft.set_field("brand", "Apple").unwrap();

    let issues = draft.validate();
    assert!(issues.contains("images"));

    let err = commit(&draft, &mut store, None).unwrap_err();
    assert!(err.issues().is_some_and(|i| i.contains("images")));
    assert_eq!(store.len(), 2);

    let report = metrics_report();
    assert_eq!(report.ops.validation_failures, 1);
    assert_eq!(report.ops.create_calls, 0);
}

#[test]
fn non_numeric_price_is_rejected_not_coerced() {
    let mut draft = ProductDraft::open(None);
    draft.set_field("price", "twelve").unwrap();

    assert_eq!(draft.validate().messages("price"), ["must be a number"]);
}

// ---------------------------------------------------------------------------
// Status workflow
// ---------------------------------------------------------------------------

#[test]
fn cart_processing_is_monotonic() {
    let mut store = EntityStore::seeded(fixtures::carts(), IdStrategy::default()).unwrap();

    let processed = store.transition(id(1), CartStatus::Processed).unwrap();
    assert_eq!(processed.status, CartStatus::Processed);

    let again = store.transition(id(1), CartStatus::Processed).unwrap_err();
    assert!(matches!(again, TransitionError::InvalidTransition { .. }));

    let back = store.transition(id(1), CartStatus::Pending).unwrap_err();
    assert!(matches!(back, TransitionError::InvalidTransition { .. }));
    assert_eq!(store.count_in(CartStatus::Processed), 2);
}
