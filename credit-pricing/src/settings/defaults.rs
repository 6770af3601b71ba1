//! Built-in catalog used when no settings are supplied.

use rust_decimal::Decimal;

use super::{
    Component, GlobalParameters, PricingMode, PricingSettings, PricingTier, Product, RateScheme,
};

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            global: GlobalParameters::default(),
            rate_scheme: RateScheme::Tiered { tiers: default_tiers() },
            products: default_products(),
        }
    }
}

impl Default for GlobalParameters {
    fn default() -> Self {
        Self {
            currency_base: "USD".to_owned(),
            currency_symbol: "$".to_owned(),
            enterprise_minimum: 5000.0,
            safety_buffer: 10.0,
            safety_buffer_enabled: false,
        }
    }
}

fn tier(name: &str, min_credits: f64, max_credits: Option<f64>, cents: i64) -> PricingTier {
    PricingTier {
        name: name.to_owned(),
        min_credits,
        max_credits,
        price_per_credit: Decimal::new(cents, 2),
    }
}

fn default_tiers() -> Vec<PricingTier> {
    vec![
        tier("Starter", 0.0, Some(10_000.0), 20),
        tier("Growth", 10_001.0, Some(50_000.0), 15),
        tier("Scale", 50_001.0, Some(250_000.0), 12),
        tier("Enterprise", 250_001.0, None, 10),
    ]
}

fn product(id: &str, name: &str, category: &str, components: Vec<Component>) -> Product {
    Product {
        id: id.to_owned(),
        name: name.to_owned(),
        category: category.to_owned(),
        components,
        mode: PricingMode::Direct,
    }
}

fn default_products() -> Vec<Product> {
    vec![
        product(
            "search-ai",
            "Search AI",
            "AI & Analytics",
            vec![
                Component::new("Prompts", "Per Prompt", 5.0),
                Component::new("Reports", "Per Report Generated", 50.0),
                Component::new("Additional LLMs", "Per Additional LLM", 10_000.0).flat(),
            ],
        ),
        product(
            "reviews",
            "Reviews",
            "Reputation Management",
            vec![Component::new("Reviews Aggregated", "Per Review Aggregated", 2.0)],
        ),
        product(
            "chatbot",
            "Chatbot",
            "Customer Engagement",
            vec![Component::new("Conversations", "Per Conversation Responded", 1.5)],
        ),
        product(
            "marketing-auto",
            "Marketing Automation",
            "Marketing",
            vec![Component::new("Reachable Contacts", "Per Reachable Contact", 0.5)],
        ),
        product(
            "mass-texting",
            "Mass Texting",
            "Communication",
            vec![Component::new("Texts Sent", "Per Text Sent", 1.0)],
        ),
        product(
            "surveys",
            "Surveys",
            "Feedback",
            vec![Component::new("Surveys Received", "Per Survey Received", 3.0)],
        ),
        product(
            "ticketing",
            "Ticketing",
            "Support",
            vec![Component::new("Tickets Closed", "Per Ticket Closed", 2.0)],
        ),
        product(
            "insights",
            "Insights",
            "Analytics",
            vec![
                Component::new("Reviews Processed", "Per Review Processed", 0.1),
                Component::new("Surveys Processed", "Per Survey Processed", 0.1),
                Component::new("Calls Processed", "Per Call Processed", 5.0),
            ],
        ),
        product(
            "competitors",
            "Competitors",
            "Market Intelligence",
            vec![
                Component::new("Reviews Processed", "Per Review Processed", 0.1),
                Component::new("Social Profiles", "Per Social Profile", 500.0).flat(),
            ],
        ),
        product(
            "referrals",
            "Referrals",
            "Growth",
            vec![Component::new("Referrals Shared", "Per Referral Shared", 10.0)],
        ),
        product(
            "social",
            "Social",
            "Social Media",
            vec![Component::new("Profiles/Handles", "Per Profile/Handle", 50.0)],
        ),
        product(
            "listings",
            "Listings",
            "Business Management",
            vec![Component::new("Locations", "Per Location", 100.0)],
        ),
    ]
}
