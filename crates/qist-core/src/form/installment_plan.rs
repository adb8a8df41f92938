use crate::{
    form::{FormBinding, FormError, ValidationIssues, parse_decimal, parse_whole, required_text},
    model::installment_plan::{InstallmentPlan, InstallmentPlanCreate, InstallmentPlanUpdate},
    traits::EntityKind,
    types::EntityId,
};

///
/// InstallmentPlanDraft
///
/// An empty `interest_rate` is missing; `"0"` is a valid interest-free plan.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InstallmentPlanDraft {
    editing: Option<EntityId>,
    pub name: String,
    pub months: String,
    pub interest_rate: String,
}

///
/// InstallmentPlanFields
///

#[derive(Clone, Debug, PartialEq)]
pub struct InstallmentPlanFields {
    pub name: String,
    pub months: u32,
    pub interest_rate: f64,
}

impl FormBinding for InstallmentPlanDraft {
    type Entity = InstallmentPlan;
    type Fields = InstallmentPlanFields;

    fn open(existing: Option<&InstallmentPlan>) -> Self {
        existing.map_or_else(Self::default, |plan| Self {
            editing: Some(plan.id),
            name: plan.name.clone(),
            months: plan.months.to_string(),
            interest_rate: plan.interest_rate.to_string(),
        })
    }

    fn editing(&self) -> Option<EntityId> {
        self.editing
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FormError> {
        let slot = match field {
            "name" => &mut self.name,
            "months" => &mut self.months,
            "interestRate" | "interest_rate" => &mut self.interest_rate,
            _ => {
                return Err(FormError::UnknownField {
                    entity: InstallmentPlan::ENTITY_NAME,
                    field: field.to_string(),
                });
            }
        };
        *slot = value.to_string();

        Ok(())
    }

    fn reconcile(&self) -> Result<InstallmentPlanFields, ValidationIssues> {
        let mut issues = ValidationIssues::default();

        let name = required_text(&mut issues, "name", &self.name);
        let months = parse_whole(&mut issues, "months", &self.months);
        if months == Some(0) {
            issues.add("months", "must be greater than zero");
        }
        let interest_rate = parse_decimal(&mut issues, "interestRate", &self.interest_rate);
        if interest_rate.is_some_and(|rate| rate < 0.0) {
            issues.add("interestRate", "must not be negative");
        }

        issues.into_result(InstallmentPlanFields {
            name,
            months: months.unwrap_or_default(),
            interest_rate: interest_rate.unwrap_or_default(),
        })
    }

    fn into_create(fields: InstallmentPlanFields) -> InstallmentPlanCreate {
        InstallmentPlanCreate {
            name: fields.name,
            months: fields.months,
            interest_rate: fields.interest_rate,
        }
    }

    fn into_update(fields: InstallmentPlanFields) -> InstallmentPlanUpdate {
        InstallmentPlanUpdate {
            name: Some(fields.name),
            months: Some(fields.months),
            interest_rate: Some(fields.interest_rate),
        }
    }
}

///
/// TESTS
///
