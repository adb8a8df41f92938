//! Core runtime for the EasyQist admin console: entity model, in-memory
//! stores, filtered views, form drafts, status workflows, and the session.
#![forbid(unsafe_code)]

pub mod admin;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod fixtures;
pub mod form;
pub mod model;
pub mod obs;
pub mod session;
pub mod status;
pub mod traits;
pub mod types;

///
/// CONSTANTS
///

/// Storage key the session user is persisted under unless configured otherwise.
pub const DEFAULT_SESSION_KEY: &str = "admin_user";

/// Mail domain used to derive a logged-in user's address.
pub const DEFAULT_EMAIL_DOMAIN: &str = "easyqist.com";

/// Upload ceiling for product images, in bytes.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 300 * 1024;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, or storage backends are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{
            branch::Branch,
            cart::{Cart, CartStatus},
            installment_plan::InstallmentPlan,
            product::Product,
            query::{Query, QueryStatus},
            user::User,
        },
        traits::{EntityKind, FieldValues, Path, Searchable},
        types::{EntityId, Timestamp},
    };
}
