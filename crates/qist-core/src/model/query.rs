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
/// QueryStatus
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    #[default]
    #[display("open")]
    Open,

    #[display("resolved")]
    Resolved,
}

impl Status for QueryStatus {
    fn successor(self) -> Option<Self> {
        match self {
            Self::Open => Some(Self::Resolved),
            Self::Resolved => None,
        }
    }
}

impl FromStr for QueryStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "resolved" => Ok(Self::Resolved),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

///
/// Query
/// Customer contact request awaiting triage.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub submitted_at: Timestamp,
    pub status: QueryStatus,
}

impl_path!(Query, "Query");

impl EntityKind for Query {
    const ENTITY_NAME: &'static str = "Query";

    type Create = QueryCreate;
    type Update = QueryUpdate;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_create(id: EntityId, create: Self::Create) -> Self {
        Self {
            id,
            name: create.name,
            email: create.email,
            phone: create.phone,
            message: create.message,
            submitted_at: create.submitted_at,
            status: create.status,
        }
    }

    fn merge(&mut self, update: Self::Update) {
        merge_field(&mut self.name, update.name);
        merge_field(&mut self.email, update.email);
        merge_field(&mut self.phone, update.phone);
        merge_field(&mut self.message, update.message);
        merge_field(&mut self.status, update.status);
    }
}

impl StatusEntity for Query {
    type Status = QueryStatus;

    fn status(&self) -> Self::Status {
        self.status
    }

    fn status_update(status: Self::Status) -> Self::Update {
        QueryUpdate {
            status: Some(status),
            ..QueryUpdate::default()
        }
    }
}

impl FieldValues for Query {
    fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "phone" => Some(&self.phone),
            "message" => Some(&self.message),
            _ => None,
        }
    }
}

impl Searchable for Query {
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email"];
}

///
/// QueryCreate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueryCreate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub submitted_at: Timestamp,
    pub status: QueryStatus,
}

///
/// QueryUpdate
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QueryUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub status: Option<QueryStatus>,
}
