use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bank::Bank;
use super::category::Category;
use super::money::Money;

/// Default upper bound on `|amount|`; anything larger is statement noise.
pub fn default_max_amount() -> Money {
    Money::from_pence(1_000_000)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTransaction {
    #[error("Description '{0}' is shorter than two characters")]
    DescriptionTooShort(String),
    #[error("Description '{0}' is purely numeric")]
    NumericDescription(String),
    #[error("Amount is zero")]
    ZeroAmount,
    #[error("Amount {0} exceeds the plausible bound of {1}")]
    AmountOutOfRange(Money, Money),
}

/// A candidate record recovered from a statement, before validation and
/// categorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub balance: Option<Money>,
}

impl TransactionDraft {
    pub fn new(date: NaiveDate, description: &str, amount: Money, balance: Option<Money>) -> Self {
        TransactionDraft {
            date,
            description: description.trim().to_string(),
            amount,
            balance,
        }
    }

    /// Checks the invariants every canonical transaction must satisfy:
    /// a description of at least two characters that is not just digits,
    /// and `0 < |amount| <= max_amount`.
    pub fn validate(&self, max_amount: Money) -> Result<(), InvalidTransaction> {
        let desc = self.description.as_str();
        if desc.chars().count() < 2 {
            return Err(InvalidTransaction::DescriptionTooShort(desc.to_string()));
        }
        if desc.chars().all(|c| c.is_ascii_digit()) {
            return Err(InvalidTransaction::NumericDescription(desc.to_string()));
        }
        if self.amount.is_zero() {
            return Err(InvalidTransaction::ZeroAmount);
        }
        if self.amount.abs() > max_amount {
            return Err(InvalidTransaction::AmountOutOfRange(self.amount, max_amount));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// One cleared movement of money, normalized across banks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub balance: Option<Money>,
    pub source_bank: Bank,
    pub category: Category,
    pub is_internal_transfer: bool,
}

impl Transaction {
    pub fn categorized(draft: TransactionDraft, source_bank: Bank, category: Category) -> Self {
        Transaction {
            date: draft.date,
            description: draft.description,
            amount: draft.amount,
            balance: draft.balance,
            source_bank,
            category,
            is_internal_transfer: category.is_internal_transfer(),
        }
    }

    pub fn kind(&self) -> TransactionKind {
        if self.amount.is_positive() {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(desc: &str, pence: i64) -> TransactionDraft {
        TransactionDraft::new(date(2024, 1, 1), desc, Money::from_pence(pence), None)
    }

    #[test]
    fn draft_trims_description() {
        assert_eq!(draft("  Tesco Store \n", -1250).description, "Tesco Store");
    }

    #[test]
    fn validate_accepts_ordinary_purchase() {
        assert!(draft("Tesco Store", -1250).validate(default_max_amount()).is_ok());
    }

    #[test]
    fn validate_rejects_short_description() {
        assert!(matches!(
            draft("X", -100).validate(default_max_amount()),
            Err(InvalidTransaction::DescriptionTooShort(_))
        ));
        assert!(matches!(
            draft("   ", -100).validate(default_max_amount()),
            Err(InvalidTransaction::DescriptionTooShort(_))
        ));
    }

    #[test]
    fn validate_rejects_numeric_description() {
        assert!(matches!(
            draft("1234", -100).validate(default_max_amount()),
            Err(InvalidTransaction::NumericDescription(_))
        ));
    }

    #[test]
    fn validate_rejects_zero_and_oversized_amounts() {
        assert_eq!(
            draft("Coffee", 0).validate(default_max_amount()),
            Err(InvalidTransaction::ZeroAmount)
        );
        assert!(matches!(
            draft("Car", 1_500_000).validate(default_max_amount()),
            Err(InvalidTransaction::AmountOutOfRange(_, _))
        ));
        assert!(matches!(
            draft("Car", -1_500_000).validate(default_max_amount()),
            Err(InvalidTransaction::AmountOutOfRange(_, _))
        ));
    }

    #[test]
    fn validate_bound_is_inclusive() {
        assert!(draft("Deposit", 1_000_000).validate(default_max_amount()).is_ok());
    }

    #[test]
    fn categorized_derives_internal_flag() {
        let monzo = |desc, pence, category| {
            Transaction::categorized(draft(desc, pence), Bank::Monzo, category)
        };
        let pot = monzo("Savings Pot", -5000, Category::PotTransfer);
        assert!(pot.is_internal_transfer);
        let food = monzo("Tesco", -5000, Category::Groceries);
        assert!(!food.is_internal_transfer);
    }

    #[test]
    fn kind_follows_sign() {
        let lloyds = |desc, pence, category| {
            Transaction::categorized(draft(desc, pence), Bank::Lloyds, category)
        };
        let income = lloyds("Salary", 300_000, Category::Income);
        assert_eq!(income.kind(), TransactionKind::Income);
        let spend = lloyds("Tesco", -1250, Category::Groceries);
        assert_eq!(spend.kind(), TransactionKind::Expense);
    }
}
