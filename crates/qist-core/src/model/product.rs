use crate::{
    model::merge_field,
    traits::{EntityKind, FieldValues, Searchable, impl_path},
    types::{EntityId, Timestamp},
};
use serde::{Deserialize, Serialize};

///
/// Product
///
/// Catalog entry. `available_installment_plan_ids` references installment
/// plans by id only; dangling ids are tolerated.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub brand: String,
    pub images: Vec<String>,
    pub available_installment_plan_ids: Vec<EntityId>,
    pub date_added: Timestamp,
}

impl_path!(Product, "Product");

impl Product {
    /// Thumbnail reference shown in listings.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    #[must_use]
    pub fn offers_plan(&self, plan_id: EntityId) -> bool {
        self.available_installment_plan_ids.contains(&plan_id)
    }
}

impl EntityKind for Product {
    const ENTITY_NAME: &'static str = "Product";

    type Create = ProductCreate;
    type Update = ProductUpdate;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_create(id: EntityId, create: Self::Create) -> Self {
        Self {
            id,
            name: create.name,
            price: create.price,
            category: create.category,
            brand: create.brand,
            images: create.images,
            available_installment_plan_ids: dedup_ids(create.available_installment_plan_ids),
            date_added: create.date_added,
        }
    }

    fn merge(&mut self, update: Self::Update) {
        merge_field(&mut self.name, update.name);
        merge_field(&mut self.price, update.price);
        merge_field(&mut self.category, update.category);
        merge_field(&mut self.brand, update.brand);
        merge_field(&mut self.images, update.images);
        merge_field(
            &mut self.available_installment_plan_ids,
            update.available_installment_plan_ids.map(dedup_ids),
        );
    }
}

impl FieldValues for Product {
    fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "category" => Some(&self.category),
            "brand" => Some(&self.brand),
            _ => None,
        }
    }
}

impl Searchable for Product {
    const SEARCH_FIELDS: &'static [&'static str] = &["name"];
}

///
/// ProductCreate
///

#[derive(Clone, Debug, PartialEq)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub brand: String,
    pub images: Vec<String>,
    pub available_installment_plan_ids: Vec<EntityId>,
    pub date_added: Timestamp,
}

///
/// ProductUpdate
///
/// `date_added` is set once on creation and never patched.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub images: Option<Vec<String>>,
    pub available_installment_plan_ids: Option<Vec<EntityId>>,
}

// Plan ids behave as a set; keep first occurrence order.
fn dedup_ids(ids: Vec<EntityId>) -> Vec<EntityId> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }

    out
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn laptop() -> Product {
        Product::from_create(
            EntityId::MIN,
            ProductCreate {
                name: "Premium Laptop".into(),
                price: 1500.0,
                category: "Electronics".into(),
                brand: "Dell".into(),
                images: vec!["/products/laptop-product.jpg".into()],
                available_installment_plan_ids: vec![
                    EntityId::new(1).unwrap(),
                    EntityId::new(2).unwrap(),
                    EntityId::new(1).unwrap(),
                ],
                date_added: Timestamp::from_seconds(1_736_899_200),
            },
        )
    }

    #[test]
    fn plan_ids_are_deduplicated_on_create() {
        let product = laptop();

        assert_eq!(product.available_installment_plan_ids.len(), 2);
        assert!(product.offers_plan(EntityId::new(2).unwrap()));
    }

    #[test]
    fn empty_update_leaves_product_unchanged() {
        let mut product = laptop();
        let before = product.clone();

        product.merge(ProductUpdate::default());

        assert_eq!(product, before);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(laptop()).unwrap();

        assert_eq!(json["id"], "1");
        assert_eq!(json["availableInstallmentPlanIds"][1], "2");
        assert!(json.get("dateAdded").is_some());
    }
}
