use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spending category assigned to every transaction.
///
/// The variant order is the order the default rule table is evaluated in,
/// with `Other` as the terminal fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    PotTransfer,
    TransfersAndPayments,
    Income,
    Refund,
    Housing,
    Utilities,
    Groceries,
    DiningOut,
    AlcoholAndSocial,
    Transportation,
    CarExpenses,
    Shopping,
    Clothing,
    HealthAndPharmacy,
    Subscriptions,
    Entertainment,
    HealthAndFitness,
    BankingAndFees,
    PersonalCare,
    Technology,
    Travel,
    Education,
    CharityAndDonations,
    Other,
}

impl Category {
    pub const ALL: [Category; 24] = [
        Category::PotTransfer,
        Category::TransfersAndPayments,
        Category::Income,
        Category::Refund,
        Category::Housing,
        Category::Utilities,
        Category::Groceries,
        Category::DiningOut,
        Category::AlcoholAndSocial,
        Category::Transportation,
        Category::CarExpenses,
        Category::Shopping,
        Category::Clothing,
        Category::HealthAndPharmacy,
        Category::Subscriptions,
        Category::Entertainment,
        Category::HealthAndFitness,
        Category::BankingAndFees,
        Category::PersonalCare,
        Category::Technology,
        Category::Travel,
        Category::Education,
        Category::CharityAndDonations,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::PotTransfer => "Pot Transfer",
            Category::TransfersAndPayments => "Transfers & Payments",
            Category::Income => "Income",
            Category::Refund => "Refund",
            Category::Housing => "Housing",
            Category::Utilities => "Utilities",
            Category::Groceries => "Groceries",
            Category::DiningOut => "Dining Out",
            Category::AlcoholAndSocial => "Alcohol & Social",
            Category::Transportation => "Transportation",
            Category::CarExpenses => "Car Expenses",
            Category::Shopping => "Shopping",
            Category::Clothing => "Clothing",
            Category::HealthAndPharmacy => "Health & Pharmacy",
            Category::Subscriptions => "Subscriptions",
            Category::Entertainment => "Entertainment",
            Category::HealthAndFitness => "Health & Fitness",
            Category::BankingAndFees => "Banking & Fees",
            Category::PersonalCare => "Personal Care",
            Category::Technology => "Technology",
            Category::Travel => "Travel",
            Category::Education => "Education",
            Category::CharityAndDonations => "Charity & Donations",
            Category::Other => "Other",
        }
    }

    fn snake_name(self) -> &'static str {
        match self {
            Category::PotTransfer => "pot_transfer",
            Category::TransfersAndPayments => "transfers_and_payments",
            Category::Income => "income",
            Category::Refund => "refund",
            Category::Housing => "housing",
            Category::Utilities => "utilities",
            Category::Groceries => "groceries",
            Category::DiningOut => "dining_out",
            Category::AlcoholAndSocial => "alcohol_and_social",
            Category::Transportation => "transportation",
            Category::CarExpenses => "car_expenses",
            Category::Shopping => "shopping",
            Category::Clothing => "clothing",
            Category::HealthAndPharmacy => "health_and_pharmacy",
            Category::Subscriptions => "subscriptions",
            Category::Entertainment => "entertainment",
            Category::HealthAndFitness => "health_and_fitness",
            Category::BankingAndFees => "banking_and_fees",
            Category::PersonalCare => "personal_care",
            Category::Technology => "technology",
            Category::Travel => "travel",
            Category::Education => "education",
            Category::CharityAndDonations => "charity_and_donations",
            Category::Other => "other",
        }
    }

    /// Pot transfers move money between the main account and a pot; they are
    /// neither income nor expense.
    pub fn is_internal_transfer(self) -> bool {
        self == Category::PotTransfer
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts either the display label ("Dining Out") or the snake_case
    /// name ("dining_out"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == wanted || c.snake_name() == wanted)
            .ok_or_else(|| format!("Unknown category: '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_label() {
        assert_eq!(Category::TransfersAndPayments.to_string(), "Transfers & Payments");
        assert_eq!(Category::PotTransfer.to_string(), "Pot Transfer");
    }

    #[test]
    fn from_str_accepts_label_and_snake_case() {
        assert_eq!(Category::from_str("Dining Out").unwrap(), Category::DiningOut);
        assert_eq!(Category::from_str("dining_out").unwrap(), Category::DiningOut);
        assert_eq!(
            Category::from_str("  HEALTH & PHARMACY ").unwrap(),
            Category::HealthAndPharmacy
        );
        assert!(Category::from_str("Pets").is_err());
    }

    #[test]
    fn label_roundtrip_for_every_variant() {
        for c in Category::ALL {
            assert_eq!(Category::from_str(&c.to_string()).unwrap(), c);
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Category::AlcoholAndSocial).unwrap();
        assert_eq!(json, "\"alcohol_and_social\"");
    }

    #[test]
    fn only_pot_transfer_is_internal() {
        assert!(Category::PotTransfer.is_internal_transfer());
        assert!(Category::ALL
            .into_iter()
            .filter(|c| c.is_internal_transfer())
            .eq([Category::PotTransfer]));
    }
}
