use crate::traits::{FieldValues, Searchable};

///
/// ViewFilter
///
/// Free-text filter over named string fields.
///
/// An item matches when the query is empty, or when at least one of the
/// listed fields contains the query as a case-insensitive substring.
/// Evaluation is pure and keeps the input order.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ViewFilter<'f> {
    needle: String,
    fields: &'f [&'f str],
}

impl<'f> ViewFilter<'f> {
    #[must_use]
    pub fn new(query: &str, fields: &'f [&'f str]) -> Self {
        Self {
            needle: casefold(query),
            fields,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    #[must_use]
    pub fn matches<E: FieldValues + ?Sized>(&self, item: &E) -> bool {
        if self.needle.is_empty() {
            return true;
        }

        self.fields.iter().any(|field| {
            // NOTE: Unknown or non-text fields are treated as non-matches.
            item.text_field(field)
                .is_some_and(|value| casefold(value).contains(&self.needle))
        })
    }

    /// Visible subsequence of `items`, in input order.
    pub fn apply<'e, E, I>(&self, items: I) -> Vec<&'e E>
    where
        E: FieldValues + 'e,
        I: IntoIterator<Item = &'e E>,
    {
        items.into_iter().filter(|item| self.matches(*item)).collect()
    }
}

impl ViewFilter<'static> {
    /// Filter over an entity's default search fields.
    #[must_use]
    pub fn for_entity<E: Searchable>(query: &str) -> Self {
        Self::new(query, E::SEARCH_FIELDS)
    }
}

/// Visible subsequence of `items` for `query` over `fields`.
pub fn apply_filter<'e, E>(items: &'e [E], query: &str, fields: &[&str]) -> Vec<&'e E>
where
    E: FieldValues,
{
    ViewFilter::new(query, fields).apply(items)
}

fn casefold(input: &str) -> String {
    if input.is_ascii() {
        return input.to_ascii_lowercase();
    }

    // Unicode fallback.
    input.to_lowercase()
}

///
/// TESTS
///
