use crate::{
    form::{FormBinding, FormError, ValidationIssues, required_text},
    model::branch::{Branch, BranchCreate, BranchUpdate},
    traits::EntityKind,
    types::EntityId,
};

///
/// BranchDraft
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BranchDraft {
    editing: Option<EntityId>,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub map_link: String,
}

///
/// BranchFields
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BranchFields {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub map_link: Option<String>,
}

impl FormBinding for BranchDraft {
    type Entity = Branch;
    type Fields = BranchFields;

    fn open(existing: Option<&Branch>) -> Self {
        existing.map_or_else(Self::default, |branch| Self {
            editing: Some(branch.id),
            name: branch.name.clone(),
            address: branch.address.clone(),
            phone: branch.phone.clone(),
            map_link: branch.map_link.clone().unwrap_or_default(),
        })
    }

    fn editing(&self) -> Option<EntityId> {
        self.editing
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FormError> {
        let slot = match field {
            "name" => &mut self.name,
            "address" => &mut self.address,
            "phone" => &mut self.phone,
            "mapLink" | "map_link" => &mut self.map_link,
            _ => {
                return Err(FormError::UnknownField {
                    entity: Branch::ENTITY_NAME,
                    field: field.to_string(),
                });
            }
        };
        *slot = value.to_string();

        Ok(())
    }

    fn reconcile(&self) -> Result<BranchFields, ValidationIssues> {
        let mut issues = ValidationIssues::default();

        let name = required_text(&mut issues, "name", &self.name);
        let address = required_text(&mut issues, "address", &self.address);
        let phone = required_text(&mut issues, "phone", &self.phone);
        let map_link = Some(self.map_link.trim())
            .filter(|link| !link.is_empty())
            .map(str::to_string);

        issues.into_result(BranchFields {
            name,
            address,
            phone,
            map_link,
        })
    }

    fn into_create(fields: BranchFields) -> BranchCreate {
        BranchCreate {
            name: fields.name,
            address: fields.address,
            phone: fields.phone,
            map_link: fields.map_link,
        }
    }

    // A cleared map link removes it from the row.
    fn into_update(fields: BranchFields) -> BranchUpdate {
        BranchUpdate {
            name: Some(fields.name),
            address: Some(fields.address),
            phone: Some(fields.phone),
            map_link: Some(fields.map_link),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::EntityStore, form::commit};

    #[test]
    fn map_link_is_optional_and_blank_means_none() {
        let mut draft = BranchDraft::default();
        draft.set_field("name", "Main Branch").unwrap();
        draft.set_field("address", "123 King Fahd Road, Riyadh").unwrap();
        draft.set_field("phone", "+966-11-1234567").unwrap();
        draft.set_field("mapLink", "   ").unwrap();

        let fields = draft.reconcile().unwrap();
        assert_eq!(fields.map_link, None);
    }

    #[test]
    fn whitespace_only_required_fields_are_missing() {
        let mut draft = BranchDraft::default();
        draft.set_field("name", "  ").unwrap();

        assert_eq!(
            draft.validate().fields().collect::<Vec<_>>(),
            ["address", "name", "phone"]
        );
    }

    #[test]
    fn committing_against_a_vanished_row_is_not_found() {
        let mut store = EntityStore::<Branch>::default();
        let mut draft = BranchDraft::default();
        draft.name = "Jeddah Branch".into();
        draft.address = "456 Tahlia Street, Jeddah".into();
        draft.phone = "+966-12-7654321".into();

        let err = commit(&draft, &mut store, Some(EntityId::new(4).unwrap())).unwrap_err();

        assert!(matches!(err, FormError::Store(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn clearing_the_map_link_removes_it() {
        let mut store = EntityStore::<Branch>::default();
        let created = store.create(BranchCreate {
            name: "Dammam Branch".into(),
            address: "789 Corniche Road, Dammam".into(),
            phone: "+966-13-8765432".into(),
            map_link: Some("https://maps.google.com/?q=Dammam".into()),
        })
        .unwrap();

        let mut draft = BranchDraft::open(Some(&created));
        draft.map_link.clear();
        let updated = draft.submit(&mut store).unwrap();

        assert!(updated.map_link.is_none());
        assert_eq!(updated.name, "Dammam Branch");
    }
}
