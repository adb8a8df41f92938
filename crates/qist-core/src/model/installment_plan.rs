use crate::{
    model::merge_field,
    traits::{EntityKind, FieldValues, Searchable, impl_path},
    types::EntityId,
};
use serde::{Deserialize, Serialize};

///
/// InstallmentPlan
///
/// Payment schedule offered on products. `interest_rate` is a percentage.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPlan {
    pub id: EntityId,
    pub name: String,
    pub months: u32,
    pub interest_rate: f64,
}

impl_path!(InstallmentPlan, "InstallmentPlan");

impl InstallmentPlan {
    /// Total payable for `price` under this plan's flat interest.
    #[must_use]
    pub fn total_for(&self, price: f64) -> f64 {
        price * (1.0 + self.interest_rate / 100.0)
    }

    /// Per-month instalment for `price`.
    #[must_use]
    pub fn monthly_for(&self, price: f64) -> f64 {
        self.total_for(price) / f64::from(self.months.max(1))
    }
}

impl EntityKind for InstallmentPlan {
    const ENTITY_NAME: &'static str = "InstallmentPlan";

    type Create = InstallmentPlanCreate;
    type Update = InstallmentPlanUpdate;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_create(id: EntityId, create: Self::Create) -> Self {
        Self {
            id,
            name: create.name,
            months: create.months,
            interest_rate: create.interest_rate,
        }
    }

    fn merge(&mut self, update: Self::Update) {
        merge_field(&mut self.name, update.name);
        merge_field(&mut self.months, update.months);
        merge_field(&mut self.interest_rate, update.interest_rate);
    }
}

impl FieldValues for InstallmentPlan {
    fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            _ => None,
        }
    }
}

impl Searchable for InstallmentPlan {
    const SEARCH_FIELDS: &'static [&'static str] = &["name"];
}

///
/// InstallmentPlanCreate
///

#[derive(Clone, Debug, PartialEq)]
pub struct InstallmentPlanCreate {
    pub name: String,
    pub months: u32,
    pub interest_rate: f64,
}

///
/// InstallmentPlanUpdate
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstallmentPlanUpdate {
    pub name: Option<String>,
    pub months: Option<u32>,
    pub interest_rate: Option<f64>,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_apply_flat_interest() {
        let plan = InstallmentPlan::from_create(
            EntityId::new(3).unwrap(),
            InstallmentPlanCreate {
                name: "12 Month Plan".into(),
                months: 12,
                interest_rate: 5.0,
            },
        );

        assert!((plan.total_for(1500.0) - 1575.0).abs() < f64::EPSILON);
        assert!((plan.monthly_for(1200.0) - 105.0).abs() < 1e-9);
    }
}
