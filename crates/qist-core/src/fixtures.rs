//! Seed data for demos and tests. Dates are UTC.

use crate::{
    model::{
        branch::Branch,
        cart::{Cart, CartStatus},
        installment_plan::InstallmentPlan,
        product::Product,
        query::{Query, QueryStatus},
    },
    types::{EntityId, Timestamp},
};

const ID_1: EntityId = EntityId::MIN;
const ID_2: EntityId = ID_1.next();
const ID_3: EntityId = ID_2.next();
const ID_4: EntityId = ID_3.next();
const ID_5: EntityId = ID_4.next();

/// Brand names offered in the product form, in display order.
pub const BRANDS: [&str; 8] = [
    "Samsung", "Apple", "Haier", "LG", "Sony", "Dell", "HP", "Logitech",
];

#[must_use]
pub fn products() -> Vec<Product> {
    let product = |id, name: &str, price, category: &str, brand: &str, image: &str, plans: &[EntityId], date| {
        Product {
            id,
            name: name.to_string(),
            price,
            category: category.to_string(),
            brand: brand.to_string(),
            images: vec![format!("/products/{image}-product.jpg")],
            available_installment_plan_ids: plans.to_vec(),
            date_added: Timestamp::from_seconds(date),
        }
    };

    vec![
        product(ID_1, "Premium Laptop", 1500.0, "Electronics", "Dell", "laptop", &[ID_1, ID_2, ID_3], 1_736_899_200),
        product(ID_2, "Wireless Headphones", 300.0, "Electronics", "Sony", "headphones", &[ID_1, ID_2], 1_736_467_200),
        product(ID_3, "Office Chair", 450.0, "Furniture", "Samsung", "chair", &[ID_1, ID_2, ID_3], 1_736_294_400),
        product(ID_4, "Desk Lamp", 80.0, "Furniture", "Haier", "lamp", &[ID_1], 1_736_035_200),
        product(ID_5, "USB Hub", 45.0, "Accessories", "Logitech", "hub", &[ID_1], 1_735_776_000),
    ]
}

#[must_use]
pub fn installment_plans() -> Vec<InstallmentPlan> {
    [(ID_1, 3, 0.0), (ID_2, 6, 2.5), (ID_3, 12, 5.0)]
        .into_iter()
        .map(|(id, months, interest_rate)| InstallmentPlan {
            id,
            name: format!("{months} Month Plan"),
            months,
            interest_rate,
        })
        .collect()
}

#[must_use]
pub fn carts() -> Vec<Cart> {
    let cart = |id, user: &str, product: &str, plan: &str, total_price, at, status| Cart {
        id,
        user_name: user.to_string(),
        product: product.to_string(),
        plan: plan.to_string(),
        total_price,
        added_at: Timestamp::from_seconds(at),
        status,
    };

    vec![
        cart(ID_1, "Ahmed Hassan", "Premium Laptop", "12 Month Plan", 1575.0, 1_737_023_400, CartStatus::Pending),
        cart(ID_2, "Fatima Ali", "Wireless Headphones", "3 Month Plan", 300.0, 1_736_950_800, CartStatus::Processed),
        cart(ID_3, "Mohamed Saleh", "Office Chair", "6 Month Plan", 461.0, 1_736_932_500, CartStatus::Pending),
    ]
}

#[must_use]
pub fn queries() -> Vec<Query> {
    let query = |id, name: &str, email: &str, phone: &str, message: &str, at, status| Query {
        id,
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        message: message.to_string(),
        submitted_at: Timestamp::from_seconds(at),
        status,
    };

    vec![
        query(
            ID_1,
            "Sarah Ahmed",
            "sarah@example.com",
            "+966-555-123456",
            "I need more information about installment plans.",
            1_737_014_400,
            QueryStatus::Open,
        ),
        query(
            ID_2,
            "Hassan Mohamed",
            "hassan@example.com",
            "+966-555-789012",
            "Can I get a discount on bulk orders?",
            1_736_872_200,
            QueryStatus::Resolved,
        ),
        query(
            ID_3,
            "Layla Karim",
            "layla@example.com",
            "+966-555-345678",
            "Issue with payment processing.",
            1_737_027_900,
            QueryStatus::Open,
        ),
    ]
}

#[must_use]
pub fn branches() -> Vec<Branch> {
    [
        (ID_1, "Main Branch", "Riyadh, Saudi Arabia", "+966-11-1234567"),
        (ID_2, "Eastern Region Branch", "Khobar, Saudi Arabia", "+966-13-8765432"),
        (ID_3, "Western Region Branch", "Jeddah, Saudi Arabia", "+966-12-5555555"),
    ]
    .into_iter()
    .map(|(id, name, address, phone)| Branch {
        id,
        name: name.to_string(),
        address: address.to_string(),
        phone: phone.to_string(),
        map_link: Some("https://maps.google.com".to_string()),
    })
    .collect()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_sizes() {
        assert_eq!(products().len(), 5);
        assert_eq!(installment_plans().len(), 3);
        assert_eq!(carts().len(), 3);
        assert_eq!(queries().len(), 3);
        assert_eq!(branches().len(), 3);
        assert_eq!(BRANDS.len(), 8);
    }

    #[test]
    fn product_dates_match_calendar_days() {
        let laptop = &products()[0];

        assert_eq!(laptop.date_added, Timestamp::parse_flexible("2025-01-15").unwrap());
        assert_eq!(laptop.primary_image(), Some("/products/laptop-product.jpg"));
    }

    #[test]
    fn plan_names_are_derived_from_months() {
        let names: Vec<_> = installment_plans().into_iter().map(|p| p.name).collect();

        assert_eq!(names, ["3 Month Plan", "6 Month Plan", "12 Month Plan"]);
    }
}
