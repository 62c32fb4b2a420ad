use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::money::Money;

/// Header-level aggregate figures a statement may print above its
/// transaction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryField {
    TotalBalanceIncludingPots,
    PersonalAccountBalance,
    BalanceInPots,
    CashbackBalance,
    TotalOutgoings,
    TotalDeposits,
}

impl SummaryField {
    pub const ALL: [SummaryField; 6] = [
        SummaryField::TotalBalanceIncludingPots,
        SummaryField::PersonalAccountBalance,
        SummaryField::BalanceInPots,
        SummaryField::CashbackBalance,
        SummaryField::TotalOutgoings,
        SummaryField::TotalDeposits,
    ];
}

impl fmt::Display for SummaryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryField::TotalBalanceIncludingPots => write!(f, "Total balance (including pots)"),
            SummaryField::PersonalAccountBalance => write!(f, "Personal account balance"),
            SummaryField::BalanceInPots => write!(f, "Balance in pots"),
            SummaryField::CashbackBalance => write!(f, "Cashback balance"),
            SummaryField::TotalOutgoings => write!(f, "Total outgoings"),
            SummaryField::TotalDeposits => write!(f, "Total deposits"),
        }
    }
}

/// Fields missing from the statement are missing from the map; they are
/// never defaulted to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceSummary(BTreeMap<SummaryField, Money>);

impl BalanceSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: SummaryField, value: Money) {
        self.0.insert(field, value);
    }

    pub fn get(&self, field: SummaryField) -> Option<Money> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SummaryField, Money)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}
