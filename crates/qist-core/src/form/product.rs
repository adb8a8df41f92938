use crate::{
    config::ImageRules,
    fixtures::BRANDS,
    form::{FormBinding, FormError, ValidationIssues, parse_decimal, required_text},
    model::product::{Product, ProductCreate, ProductUpdate},
    traits::EntityKind,
    types::{EntityId, Timestamp},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error as ThisError;

///
/// UploadError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum UploadError {
    #[error("file must be an image (got '{mime}')")]
    NotAnImage { mime: String },

    #[error("image must be under {}KB, current: {}KB", .max / 1024, kib(*.size))]
    TooLarge { size: u64, max: u64 },
}

#[allow(clippy::cast_precision_loss)]
fn kib(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0)
}

///
/// ImageUpload
/// Raw file handed to a product draft.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageUpload {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    #[must_use]
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Check the upload against `rules`.
    pub fn check(&self, rules: &ImageRules) -> Result<(), UploadError> {
        let size = self.bytes.len() as u64;
        if size > rules.max_bytes {
            return Err(UploadError::TooLarge {
                size,
                max: rules.max_bytes,
            });
        }

        if !self.mime.starts_with(&rules.allowed_prefix) {
            return Err(UploadError::NotAnImage {
                mime: self.mime.clone(),
            });
        }

        Ok(())
    }

    /// `data:<mime>;base64,<payload>` reference for the image list.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

///
/// ProductDraft
///
/// `price` stays textual until reconcile; images and plan ids are edited
/// through dedicated helpers.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProductDraft {
    editing: Option<EntityId>,
    pub name: String,
    pub price: String,
    pub category: String,
    pub brand: String,
    pub images: Vec<String>,
    pub plan_ids: Vec<EntityId>,
}

///
/// ProductFields
///

#[derive(Clone, Debug, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub brand: String,
    pub images: Vec<String>,
    pub plan_ids: Vec<EntityId>,
}

impl ProductDraft {
    /// Append an image reference. Blank input and duplicates are ignored.
    ///
    /// Input is trimmed before the duplicate check, so `" a.jpg"` and
    /// `"a.jpg"` name the same image.
    pub fn add_image(&mut self, reference: &str) -> bool {
        let reference = reference.trim();
        if reference.is_empty() || self.images.iter().any(|i| i == reference) {
            return false;
        }

        self.images.push(reference.to_string());
        true
    }

    /// Drop the image at `index`; out-of-range indices are ignored.
    pub fn remove_image(&mut self, index: usize) -> Option<String> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    /// Add `plan_id` if absent, remove it if present. Returns membership
    /// after the toggle.
    pub fn toggle_plan(&mut self, plan_id: EntityId) -> bool {
        if let Some(pos) = self.plan_ids.iter().position(|id| *id == plan_id) {
            self.plan_ids.remove(pos);
            false
        } else {
            self.plan_ids.push(plan_id);
            true
        }
    }

    /// Validate `upload` and append it as a data-URL image.
    pub fn attach_upload(
        &mut self,
        upload: &ImageUpload,
        rules: &ImageRules,
    ) -> Result<bool, UploadError> {
        upload.check(rules)?;

        Ok(self.add_image(&upload.to_data_url()))
    }
}

impl FormBinding for ProductDraft {
    type Entity = Product;
    type Fields = ProductFields;

    fn open(existing: Option<&Product>) -> Self {
        let Some(p) = existing else {
            return Self::default();
        };

        Self {
            editing: Some(p.id),
            name: p.name.clone(),
            price: p.price.to_string(),
            category: p.category.clone(),
            brand: p.brand.clone(),
            images: p.images.clone(),
            plan_ids: p.available_installment_plan_ids.clone(),
        }
    }

    fn editing(&self) -> Option<EntityId> {
        self.editing
    }

    // `image` appends one reference; `images` and `plans` replace the list
    // from comma-separated input.
    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FormError> {
        match field {
            "name" => self.name = value.to_string(),
            "price" => self.price = value.to_string(),
            "category" => self.category = value.to_string(),
            "brand" => self.brand = value.to_string(),
            "image" => {
                self.add_image(value);
            }
            "images" => {
                self.images.clear();
                for reference in value.split(',') {
                    self.add_image(reference);
                }
            }
            "plans" | "availableInstallmentPlanIds" => {
                let mut ids = Vec::new();
                let mut issues = ValidationIssues::default();
                for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                    match part.parse::<EntityId>() {
                        Ok(id) if !ids.contains(&id) => ids.push(id),
                        Ok(_) => {}
                        Err(err) => issues.add("availableInstallmentPlanIds", err.to_string()),
                    }
                }
                if !issues.is_empty() {
                    return Err(FormError::ValidationFailed(issues));
                }
                self.plan_ids = ids;
            }
            _ => {
                return Err(FormError::UnknownField {
                    entity: Product::ENTITY_NAME,
                    field: field.to_string(),
                });
            }
        }

        Ok(())
    }

    fn reconcile(&self) -> Result<ProductFields, ValidationIssues> {
        let mut issues = ValidationIssues::default();

        let name = required_text(&mut issues, "name", &self.name);
        let price = parse_decimal(&mut issues, "price", &self.price);
        if price.is_some_and(|p| p <= 0.0) {
            issues.add("price", "must be greater than zero");
        }
        let category = required_text(&mut issues, "category", &self.category);
        let brand = required_text(&mut issues, "brand", &self.brand);
        if !brand.is_empty() && !BRANDS.contains(&brand.as_str()) {
            issues.add("brand", format!("must be one of {}", BRANDS.join(", ")));
        }
        if self.images.is_empty() {
            issues.add("images", "at least one image is required");
        }

        issues.into_result(ProductFields {
            name,
            price: price.unwrap_or_default(),
            category,
            brand,
            images: self.images.clone(),
            plan_ids: self.plan_ids.clone(),
        })
    }

    fn into_create(fields: ProductFields) -> ProductCreate {
        ProductCreate {
            name: fields.name,
            price: fields.price,
            category: fields.category,
            brand: fields.brand,
            images: fields.images,
            available_installment_plan_ids: fields.plan_ids,
            date_added: Timestamp::now(),
        }
    }

    fn into_update(fields: ProductFields) -> ProductUpdate {
        ProductUpdate {
            name: Some(fields.name),
            price: Some(fields.price),
            category: Some(fields.category),
            brand: Some(fields.brand),
            images: Some(fields.images),
            available_installment_plan_ids: Some(fields.plan_ids),
        }
    }
}

///
/// TESTS
///
