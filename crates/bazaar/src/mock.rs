//! Inline mock data standing in for the backend until one exists.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub description: String,
    /// Price in minor units of `currency`.
    pub price_cents: i64,
    pub currency: String,
    pub seller: String,
}

static CATALOG: Lazy<Vec<Product>> = Lazy::new(|| {
    vec![
        Product {
            id: 1,
            name: "Hand-woven basket".into(),
            description: "Palm-leaf basket from the Epe workshop.".into(),
            price_cents: 750_000,
            currency: "NGN".into(),
            seller: "Epe Crafts".into(),
        },
        Product {
            id: 2,
            name: "Adire throw pillow".into(),
            description: "Indigo-dyed cotton cover, 45cm.".into(),
            price_cents: 420_000,
            currency: "NGN".into(),
            seller: "Bisi Textiles".into(),
        },
        Product {
            id: 3,
            name: "Cold-pressed groundnut oil".into(),
            description: "One litre, this week's pressing.".into(),
            price_cents: 185_000,
            currency: "NGN".into(),
            seller: "Kano Mills".into(),
        },
        Product {
            id: 4,
            name: "Leather sandals".into(),
            description: "Full-grain leather, made to order.".into(),
            price_cents: 1_250_000,
            currency: "NGN".into(),
            seller: "Sabo Leatherworks".into(),
        },
    ]
});

pub fn products() -> &'static [Product] {
    &CATALOG
}

pub fn product_by_id(id: u64) -> Option<&'static Product> {
    CATALOG.iter().find(|product| product.id == id)
}

struct DemoAccount {
    email: &'static str,
    password: &'static str,
    name: &'static str,
    role: &'static str,
}

/// One demo account per marketplace role.
const DEMO_ACCOUNTS: &[DemoAccount] = &[
    DemoAccount {
        email: "buyer@example.com",
        password: "password123",
        name: "Ada",
        role: "buyer",
    },
    DemoAccount {
        email: "seller@example.com",
        password: "password123",
        name: "Bisi",
        role: "seller",
    },
    DemoAccount {
        email: "admin@example.com",
        password: "password123",
        name: "Chuks",
        role: "admin",
    },
];

/// Mock credential check. Returns an access token plus the user record the
/// store keeps under `user`.
pub fn authenticate(email: &str, password: &str) -> Option<(String, Value)> {
    DEMO_ACCOUNTS
        .iter()
        .find(|account| account.email == email && account.password == password)
        .map(|account| {
            (
                format!("mock-token-{}", account.role),
                json!({
                    "email": account.email,
                    "name": account.name,
                    "role": account.role,
                }),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup() {
        assert!(!products().is_empty());
        assert_eq!(product_by_id(2).map(|p| p.seller.as_str()), Some("Bisi Textiles"));
        assert_eq!(product_by_id(999), None);
    }

    #[test]
    fn authenticate_accepts_demo_accounts_only() {
        let (token, user) = authenticate("seller@example.com", "password123").expect("demo login");
        assert_eq!(token, "mock-token-seller");
        assert_eq!(user["role"], "seller");

        assert!(authenticate("seller@example.com", "wrong").is_none());
        assert!(authenticate("nobody@example.com", "password123").is_none());
    }
}
