use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::Category;
use super::money::Money;
use super::period::DateRange;
use super::transaction::{Transaction, TransactionKind};

/// Income/expense figures for one statement. Pot transfers never count as
/// income or expense; they are reported through `pot_in`/`pot_out` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementTotals {
    pub income: Money,
    pub expenses: Money,
    pub net_savings: Money,
    pub pot_in: Money,
    pub pot_out: Money,
    /// `|sum of pot transfer amounts|`.
    pub pot_transfer_net: Money,
    pub expenses_by_category: BTreeMap<Category, Money>,
    pub transaction_count: usize,
    pub regular_count: usize,
    pub pot_transfer_count: usize,
    pub date_range: Option<DateRange>,
}

impl StatementTotals {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let (pots, regular): (Vec<&Transaction>, Vec<&Transaction>) =
            transactions.iter().partition(|t| t.is_internal_transfer);

        let of_kind = |kind: TransactionKind| {
            regular
                .iter()
                .filter(move |t| t.kind() == kind)
                .map(|t| t.amount.abs())
                .sum::<Money>()
        };
        let income = of_kind(TransactionKind::Income);
        let expenses = of_kind(TransactionKind::Expense);
        let pot_in: Money = pots
            .iter()
            .filter(|t| t.amount.is_positive())
            .map(|t| t.amount)
            .sum();
        let pot_out: Money = pots
            .iter()
            .filter(|t| t.amount.is_negative())
            .map(|t| t.amount.abs())
            .sum();
        let pot_transfer_net = pots.iter().map(|t| t.amount).sum::<Money>().abs();

        let mut expenses_by_category = BTreeMap::new();
        for t in regular.iter().filter(|t| t.kind() == TransactionKind::Expense) {
            let entry = expenses_by_category.entry(t.category).or_insert_with(Money::zero);
            *entry = *entry + t.amount.abs();
        }

        StatementTotals {
            income,
            expenses,
            net_savings: income - expenses,
            pot_in,
            pot_out,
            pot_transfer_net,
            expenses_by_category,
            transaction_count: transactions.len(),
            regular_count: regular.len(),
            pot_transfer_count: pots.len(),
            date_range: DateRange::spanning(transactions.iter().map(|t| t.date)),
        }
    }

    /// Expense categories, largest total first; ties keep category order.
    pub fn top_expense_categories(&self) -> Vec<(Category, Money)> {
        let mut ranked: Vec<(Category, Money)> =
            self.expenses_by_category.iter().map(|(c, m)| (*c, *m)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::Bank;
    use crate::transaction::TransactionDraft;
    use chrono::NaiveDate;

    fn tx(day: u32, desc: &str, pence: i64, category: Category) -> Transaction {
        let draft = TransactionDraft::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            desc,
            Money::from_pence(pence),
            None,
        );
        Transaction::categorized(draft, Bank::Monzo, category)
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(1, "Salary", 300_000, Category::Income),
            tx(2, "Tesco Store", -1250, Category::Groceries),
            tx(3, "Transfer to Savings Pot", -5000, Category::PotTransfer),
            tx(4, "Sainsbury", -2000, Category::Groceries),
            tx(5, "Transfer from Pot", 1000, Category::PotTransfer),
            tx(6, "Netflix", -1099, Category::Subscriptions),
        ]
    }

    #[test]
    fn pot_transfers_are_excluded_from_income_and_expenses() {
        let totals = StatementTotals::from_transactions(&sample());
        assert_eq!(totals.income, Money::from_pence(300_000));
        assert_eq!(totals.expenses, Money::from_pence(1250 + 2000 + 1099));
        assert_eq!(totals.net_savings, Money::from_pence(300_000 - 4349));
        assert_eq!(totals.pot_out, Money::from_pence(5000));
        assert_eq!(totals.pot_in, Money::from_pence(1000));
        assert_eq!(totals.pot_transfer_net, Money::from_pence(4000));
    }

    #[test]
    fn category_totals_skip_pots_and_income() {
        let totals = StatementTotals::from_transactions(&sample());
        assert_eq!(
            totals.expenses_by_category.get(&Category::Groceries),
            Some(&Money::from_pence(3250))
        );
        assert!(!totals.expenses_by_category.contains_key(&Category::PotTransfer));
        assert!(!totals.expenses_by_category.contains_key(&Category::Income));
    }

    #[test]
    fn counts_and_date_range() {
        let totals = StatementTotals::from_transactions(&sample());
        assert_eq!(totals.transaction_count, 6);
        assert_eq!(totals.regular_count, 4);
        assert_eq!(totals.pot_transfer_count, 2);
        let range = totals.date_range.unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
    }

    #[test]
    fn top_categories_sorted_descending() {
        let totals = StatementTotals::from_transactions(&sample());
        let top = totals.top_expense_categories();
        assert_eq!(top[0], (Category::Groceries, Money::from_pence(3250)));
        assert_eq!(top[1], (Category::Subscriptions, Money::from_pence(1099)));
    }

    #[test]
    fn empty_statement_is_all_zero() {
        let totals = StatementTotals::from_transactions(&[]);
        assert!(totals.income.is_zero());
        assert!(totals.expenses.is_zero());
        assert_eq!(totals.date_range, None);
        assert!(totals.top_expense_categories().is_empty());
    }
}
