use crate::{
    db::ViewFilter,
    model::{
        cart::{Cart, CartStatus},
        product::Product,
        query::{Query, QueryStatus},
    },
};
use serde::Serialize;

///
/// DashboardSummary
/// Headline counters for the landing page.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_products: usize,

    /// Carts still pending.
    pub active_carts: usize,

    /// All carts, in any status.
    pub total_orders: usize,

    /// Sum of `total_price` over every cart.
    pub total_revenue: f64,
}

impl DashboardSummary {
    #[must_use]
    pub fn compute(products: &[Product], carts: &[Cart]) -> Self {
        Self {
            total_products: products.len(),
            active_carts: pending_count(carts.iter()),
            total_orders: carts.len(),
            total_revenue: carts.iter().map(|cart| cart.total_price).sum(),
        }
    }
}

/// Pending carts among `carts`, typically a filtered view.
pub fn pending_count<'a>(carts: impl IntoIterator<Item = &'a Cart>) -> usize {
    carts
        .into_iter()
        .filter(|cart| cart.status == CartStatus::Pending)
        .count()
}

/// Open queries among `queries`, typically a filtered view.
pub fn open_count<'a>(queries: impl IntoIterator<Item = &'a Query>) -> usize {
    queries
        .into_iter()
        .filter(|query| query.status == QueryStatus::Open)
        .count()
}

///
/// ListingCounts
/// The "Total: n | Pending: m" line above a filtered listing.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ListingCounts {
    pub total: usize,
    pub flagged: usize,
}

impl ListingCounts {
    /// Counts for carts matching `query`, flagging pending ones.
    #[must_use]
    pub fn carts(carts: &[Cart], query: &str) -> Self {
        let visible = ViewFilter::for_entity::<Cart>(query).apply(carts);

        Self {
            total: visible.len(),
            flagged: pending_count(visible.iter().copied()),
        }
    }

    /// Counts for queries matching `query`, flagging open ones.
    #[must_use]
    pub fn queries(queries: &[Query], query: &str) -> Self {
        let visible = ViewFilter::for_entity::<Query>(query).apply(queries);

        Self {
            total: visible.len(),
            flagged: open_count(visible.iter().copied()),
        }
    }
}

///
/// TESTS
///
