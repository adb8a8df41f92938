//! One-line text renderings of console rows.

use qist_core::{
    dashboard::{DashboardSummary, ListingCounts},
    model::{
        branch::Branch, cart::Cart, installment_plan::InstallmentPlan, product::Product,
        query::Query, user::User,
    },
    types::Rfc3339,
};

///
/// Render
///

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Product {
    fn render(&self) -> String {
        let plans: Vec<String> = self
            .available_installment_plan_ids
            .iter()
            .map(ToString::to_string)
            .collect();

        let images = match self.primary_image() {
            Some(first) if first.starts_with("data:") => {
                format!("{} image(s), first uploaded", self.images.len())
            }
            Some(first) => format!("{} image(s), first {first}", self.images.len()),
            None => "no images".to_string(),
        };

        format!(
            "#{} {} | ${:.2} | {} / {} | {images} | plans [{}] | added {}",
            self.id,
            self.name,
            self.price,
            self.category,
            self.brand,
            plans.join(","),
            Rfc3339(self.date_added),
        )
    }
}

impl Render for InstallmentPlan {
    fn render(&self) -> String {
        format!(
            "#{} {} | {} months | {}% interest",
            self.id, self.name, self.months, self.interest_rate
        )
    }
}

impl Render for Branch {
    fn render(&self) -> String {
        let mut line = format!("#{} {} | {} | {}", self.id, self.name, self.address, self.phone);
        if let Some(link) = &self.map_link {
            line.push_str(" | ");
            line.push_str(link);
        }

        line
    }
}

impl Render for Cart {
    fn render(&self) -> String {
        format!(
            "#{} {} | {} on {} | ${:.2} | {} | {}",
            self.id,
            self.user_name,
            self.product,
            self.plan,
            self.total_price,
            Rfc3339(self.added_at),
            self.status,
        )
    }
}

impl Render for Query {
    fn render(&self) -> String {
        format!(
            "#{} {} <{}> {} | {} | {}\n    {}",
            self.id,
            self.name,
            self.email,
            self.phone,
            Rfc3339(self.submitted_at),
            self.status,
            self.message,
        )
    }
}

impl Render for User {
    fn render(&self) -> String {
        format!("{} ({}) <{}>", self.name, self.username, self.email)
    }
}

impl Render for DashboardSummary {
    fn render(&self) -> String {
        format!(
            "Total Products: {}\nActive Carts:   {}\nTotal Revenue:  ${:.2}\nTotal Orders:   {}",
            self.total_products, self.active_carts, self.total_revenue, self.total_orders
        )
    }
}

/// Footer under a status listing, e.g. `Total: 3 | Pending: 2`.
#[must_use]
pub fn counts_footer(counts: ListingCounts, flag: &str) -> String {
    format!("Total: {} | {flag}: {}", counts.total, counts.flagged)
}

///
/// TESTS
///
