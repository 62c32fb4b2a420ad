use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tally_core::Category;

use crate::config::ConfigError;

/// One ordered entry of the classifier table: if the description contains
/// any keyword, the transaction gets `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: Category, keywords: &[&str]) -> Self {
        CategoryRule {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Default classifier table. Pot movements come first so that
/// "Payment to Savings Pot" never lands in the generic transfer bucket.
pub const DEFAULT_RULES: &[(Category, &[&str])] = &[
    (
        Category::PotTransfer,
        &[
            "transfer from pot", "transfer to pot", "pot transfer", "pot to pot",
            "between pots", "move to pot", "pot withdrawal", "monzo pot", "pot deposit",
            "savings pot", "bills pot", "expenses pot", "shared pot", "monzo plus pot",
        ],
    ),
    (Category::TransfersAndPayments, &["p2p payment", "payment to", "paid to"]),
    (Category::Income, &["salary", "wages", "pay", "income"]),
    (Category::Refund, &["refund", "return", "cashback"]),
    (Category::Housing, &["rent", "mortgage", "property", "council tax"]),
    (
        Category::Utilities,
        &["electric", "gas", "water", "bill", "utility", "broadband", "internet"],
    ),
    (
        Category::Groceries,
        &["tesco", "sainsbury", "asda", "morrisons", "grocery", "food", "supermarket"],
    ),
    (
        Category::DiningOut,
        &["restaurant", "cafe", "coffee", "dining", "eat", "takeaway", "deliveroo", "just eat"],
    ),
    (Category::AlcoholAndSocial, &["pub", "bar", "wine", "beer"]),
    (
        Category::Transportation,
        &["uber", "taxi", "bus", "train", "tube", "transport", "tfl", "national rail"],
    ),
    (Category::CarExpenses, &["petrol", "gas", "fuel", "parking"]),
    (Category::Shopping, &["amazon", "ebay", "shop", "store", "purchase", "retail"]),
    (Category::Clothing, &["clothing", "fashion", "h&m", "zara", "primark"]),
    (Category::HealthAndPharmacy, &["pharmacy", "boots", "superdrug", "medicine"]),
    (
        Category::Subscriptions,
        &["netflix", "spotify", "subscription", "prime", "disney+"],
    ),
    (
        Category::Entertainment,
        &["cinema", "movie", "entertainment", "theatre", "concert"],
    ),
    (Category::HealthAndFitness, &["gym", "fitness", "health", "exercise"]),
    (Category::BankingAndFees, &["bank", "interest", "fee", "charge", "payment"]),
    (Category::PersonalCare, &["hair", "beauty", "salon", "barber"]),
    (Category::Technology, &["apple", "google", "microsoft", "app", "software"]),
    (
        Category::Travel,
        &["hotel", "flight", "holiday", "travel", "airbnb", "booking"],
    ),
    (Category::Education, &["course", "education", "book", "university"]),
    (Category::CharityAndDonations, &["charity", "donation", "fund"]),
];

#[derive(Debug, Deserialize)]
struct RuleFile {
    rule: Vec<CategoryRule>,
}

/// Ordered keyword classifier. First matching rule wins; no match is `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::new(
            DEFAULT_RULES
                .iter()
                .map(|(category, keywords)| CategoryRule::new(*category, keywords))
                .collect(),
        )
    }
}

impl CategoryRules {
    /// Keywords are lowercased once here so `classify` only lowercases the
    /// description.
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|r| CategoryRule {
                category: r.category,
                keywords: r
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();
        Self { rules }
    }

    /// Load a replacement table written as `[[rule]]` entries.
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let file: RuleFile = toml::from_str(toml_content)?;
        Ok(Self::new(file.rule))
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn find_matching_rule(&self, description: &str) -> Option<&CategoryRule> {
        let text = description.trim().to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| text.contains(k.as_str())))
    }

    pub fn classify(&self, description: &str) -> Category {
        self.find_matching_rule(description)
            .map(|r| r.category)
            .unwrap_or(Category::Other)
    }
}

/// Classify with the built-in table.
pub fn classify(description: &str) -> Category {
    static DEFAULT: OnceLock<CategoryRules> = OnceLock::new();
    DEFAULT.get_or_init(CategoryRules::default).classify(description)
}
