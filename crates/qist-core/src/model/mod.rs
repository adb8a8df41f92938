pub mod branch;
pub mod cart;
pub mod installment_plan;
pub mod product;
pub mod query;
pub mod user;

/// Apply full-replacement semantics for one optional patch field.
pub(crate) fn merge_field<T>(value: &mut T, patch: Option<T>) {
    if let Some(next) = patch {
        *value = next;
    }
}
