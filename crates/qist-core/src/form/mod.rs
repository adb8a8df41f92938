//! Form drafts: editable, string-typed copies of an entity's fields that are
//! validated and reconciled into typed payloads before touching a store.

mod branch;
mod installment_plan;
mod product;

pub use branch::BranchDraft;
pub use installment_plan::InstallmentPlanDraft;
pub use product::{ImageUpload, ProductDraft, UploadError};

use crate::{
    db::{EntityStore, StoreError},
    obs::sink::{self, MetricsEvent},
    traits::EntityKind,
    types::EntityId,
};
use std::{collections::BTreeMap, fmt};
use thiserror::Error as ThisError;
use tracing::warn;

///
/// FormError
///

#[derive(Debug, ThisError)]
pub enum FormError {
    #[error("validation failed: {0}")]
    ValidationFailed(ValidationIssues),

    #[error("unknown field '{field}' on {entity} form")]
    UnknownField {
        entity: &'static str,
        field: String,
    },

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl FormError {
    /// Violated-field set, when this is a validation failure.
    #[must_use]
    pub const fn issues(&self) -> Option<&ValidationIssues> {
        match self {
            Self::ValidationFailed(issues) => Some(issues),
            _ => None,
        }
    }
}

///
/// ValidationIssues
///
/// Field name -> messages. Empty means the draft is valid.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationIssues(BTreeMap<String, Vec<String>>);

impl ValidationIssues {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Names of the violated fields, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// `Ok(value)` when no issue was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }

        Ok(())
    }
}

///
/// FormBinding
///
/// A draft for one entity type.
///
/// `reconcile` is the single place textual input becomes typed data:
/// numeric text is parsed there and rejected when malformed, never
/// coerced to a default.
///

pub trait FormBinding: Sized {
    type Entity: EntityKind;

    /// Typed, validated field set produced by `reconcile`.
    type Fields;

    /// Empty draft for `None`, or a copy of every editable field.
    fn open(existing: Option<&Self::Entity>) -> Self;

    /// Id of the row this draft was opened from, if editing.
    fn editing(&self) -> Option<EntityId>;

    /// Set a textual field by its wire name.
    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FormError>;

    fn reconcile(&self) -> Result<Self::Fields, ValidationIssues>;

    fn into_create(fields: Self::Fields) -> <Self::Entity as EntityKind>::Create;

    fn into_update(fields: Self::Fields) -> <Self::Entity as EntityKind>::Update;

    /// Violated fields; empty when the draft can be committed.
    fn validate(&self) -> ValidationIssues {
        match self.reconcile() {
            Ok(_) => ValidationIssues::default(),
            Err(issues) => issues,
        }
    }

    /// Commit against the row this draft was opened from.
    fn submit(&self, store: &mut EntityStore<Self::Entity>) -> Result<Self::Entity, FormError> {
        commit(self, store, self.editing())
    }
}

/// Validate `draft` and write it to `store`.
///
/// Updates the row `existing` when given, creates otherwise. An invalid
/// draft performs no mutation.
pub fn commit<F: FormBinding>(
    draft: &F,
    store: &mut EntityStore<F::Entity>,
    existing: Option<EntityId>,
) -> Result<F::Entity, FormError> {
    let fields = match draft.reconcile() {
        Ok(fields) => fields,
        Err(issues) => {
            sink::record(MetricsEvent::ValidationFailed {
                entity_path: <F::Entity as crate::traits::Path>::PATH,
            });
            warn!(
                entity = <F::Entity as EntityKind>::ENTITY_NAME,
                %issues,
                "draft rejected"
            );

            return Err(FormError::ValidationFailed(issues));
        }
    };

    match existing {
        Some(id) => Ok(store.update(id, F::into_update(fields))?),
        None => Ok(store.create(F::into_create(fields))?),
    }
}

// ---------------------------------------------------------------------------
// Field helpers shared by the drafts
// ---------------------------------------------------------------------------

const REQUIRED: &str = "is required";

// Trimmed text, or an issue when blank.
fn required_text(issues: &mut ValidationIssues, field: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        issues.add(field, REQUIRED);
    }

    value.to_string()
}

// Parse a finite decimal; `None` when missing or malformed.
fn parse_decimal(issues: &mut ValidationIssues, field: &str, value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        issues.add(field, REQUIRED);
        return None;
    }

    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => {
            issues.add(field, "must be a number");
            None
        }
    }
}

// Parse a whole number; `None` when missing or malformed.
fn parse_whole(issues: &mut ValidationIssues, field: &str, value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() {
        issues.add(field, REQUIRED);
        return None;
    }

    if let Ok(n) = value.parse::<u32>() {
        Some(n)
    } else {
        issues.add(field, "must be a whole number");
        None
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_render_field_and_message() {
        let mut issues = ValidationIssues::default();
        issues.add("price", "must be a number");
        issues.add("name", REQUIRED);

        assert_eq!(
            issues.to_string(),
            "name: is required; price: must be a number"
        );
        assert_eq!(issues.fields().collect::<Vec<_>>(), ["name", "price"]);
        assert!(issues.messages("brand").is_empty());
    }

    #[test]
    fn decimal_parsing_rejects_garbage_instead_of_coercing() {
        let mut issues = ValidationIssues::default();

        assert_eq!(parse_decimal(&mut issues, "price", " 12.5 "), Some(12.5));
        assert_eq!(parse_decimal(&mut issues, "price", "12abc"), None);
        assert_eq!(parse_decimal(&mut issues, "rate", "NaN"), None);
        assert_eq!(parse_whole(&mut issues, "months", "2.5"), None);

        assert!(issues.contains("price"));
        assert!(issues.contains("rate"));
        assert!(issues.contains("months"));
    }
}
