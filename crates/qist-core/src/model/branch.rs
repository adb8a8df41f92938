use crate::{
    model::merge_field,
    traits::{EntityKind, FieldValues, Searchable, impl_path},
    types::EntityId,
};
use serde::{Deserialize, Serialize};

///
/// Branch
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: EntityId,
    pub name: String,
    pub address: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_link: Option<String>,
}

impl_path!(Branch, "Branch");

impl EntityKind for Branch {
    const ENTITY_NAME: &'static str = "Branch";

    type Create = BranchCreate;
    type Update = BranchUpdate;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_create(id: EntityId, create: Self::Create) -> Self {
        Self {
            id,
            name: create.name,
            address: create.address,
            phone: create.phone,
            map_link: create.map_link,
        }
    }

    fn merge(&mut self, update: Self::Update) {
        merge_field(&mut self.name, update.name);
        merge_field(&mut self.address, update.address);
        merge_field(&mut self.phone, update.phone);
        merge_field(&mut self.map_link, update.map_link);
    }
}

impl FieldValues for Branch {
    fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "address" => Some(&self.address),
            "phone" => Some(&self.phone),
            "mapLink" => self.map_link.as_deref(),
            _ => None,
        }
    }
}

impl Searchable for Branch {
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "address"];
}

///
/// BranchCreate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BranchCreate {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub map_link: Option<String>,
}

///
/// BranchUpdate
///
/// `map_link: Some(None)` clears the link.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BranchUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub map_link: Option<Option<String>>,
}
