use crate::{
    model::merge_field,
    status::{Status, StatusEntity, UnknownStatus},
    traits::{EntityKind, FieldValues, Searchable, impl_path},
    types::{EntityId, Timestamp},
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

///
/// CartStatus
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CartStatus {
    #[default]
    #[display("pending")]
    Pending,

    #[display("processed")]
    Processed,
}

impl Status for CartStatus {
    fn successor(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Processed),
            Self::Processed => None,
        }
    }
}

impl FromStr for CartStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processed" => Ok(Self::Processed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

///
/// Cart
///
/// Submitted order. `product` and `plan` are denormalized display names,
/// not ids.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: EntityId,
    pub user_name: String,
    pub product: String,
    pub plan: String,
    pub total_price: f64,
    pub added_at: Timestamp,
    pub status: CartStatus,
}

impl_path!(Cart, "Cart");

impl EntityKind for Cart {
    const ENTITY_NAME: &'static str = "Cart";

    type Create = CartCreate;
    type Update = CartUpdate;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_create(id: EntityId, create: Self::Create) -> Self {
        Self {
            id,
            user_name: create.user_name,
            product: create.product,
            plan: create.plan,
            total_price: create.total_price,
            added_at: create.added_at,
            status: create.status,
        }
    }

    fn merge(&mut self, update: Self::Update) {
        merge_field(&mut self.user_name, update.user_name);
        merge_field(&mut self.product, update.product);
        merge_field(&mut self.plan, update.plan);
        merge_field(&mut self.total_price, update.total_price);
        merge_field(&mut self.status, update.status);
    }
}

impl StatusEntity for Cart {
    type Status = CartStatus;

    fn status(&self) -> Self::Status {
        self.status
    }

    fn status_update(status: Self::Status) -> Self::Update {
        CartUpdate {
            status: Some(status),
            ..CartUpdate::default()
        }
    }
}

impl FieldValues for Cart {
    fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "userName" => Some(&self.user_name),
            "product" => Some(&self.product),
            "plan" => Some(&self.plan),
            _ => None,
        }
    }
}

impl Searchable for Cart {
    const SEARCH_FIELDS: &'static [&'static str] = &["userName", "product"];
}

///
/// CartCreate
///

#[derive(Clone, Debug, PartialEq)]
pub struct CartCreate {
    pub user_name: String,
    pub product: String,
    pub plan: String,
    pub total_price: f64,
    pub added_at: Timestamp,
    pub status: CartStatus,
}

///
/// CartUpdate
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CartUpdate {
    pub user_name: Option<String>,
    pub product: Option<String>,
    pub plan: Option<String>,
    pub total_price: Option<f64>,
    pub status: Option<CartStatus>,
}
