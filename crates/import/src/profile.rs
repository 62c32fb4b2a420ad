use serde::{Deserialize, Serialize};
use tally_core::{default_max_amount, Bank, Money, SummaryField};

/// Header names a bank uses for each canonical column. Matching is
/// case-insensitive: an exact name wins over a name merely containing a
/// synonym.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSynonyms {
    pub date: Vec<String>,
    pub description: Vec<String>,
    pub amount: Vec<String>,
    pub debit: Vec<String>,
    pub credit: Vec<String>,
    pub balance: Vec<String>,
    pub category: Vec<String>,
}

/// A literal phrase printed directly before one aggregate figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLabel {
    pub field: SummaryField,
    pub label: String,
}

/// Everything that differs between banks. Adding a bank means adding one of
/// these, not touching the extractors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankProfile {
    pub bank: Bank,
    pub headers: HeaderSynonyms,
    /// Text fragments that mark a candidate as statement boilerplate.
    pub noise_keywords: Vec<String>,
    pub summary_labels: Vec<SummaryLabel>,
    /// Values in the bank's own category column that mean "pot movement".
    pub pot_markers: Vec<String>,
    /// `chrono` formats tried before the common fallbacks.
    pub date_formats: Vec<String>,
    pub max_amount: Money,
    /// Below this many primary-strategy transactions the fallback runs.
    pub min_primary_yield: usize,
}

pub const DEFAULT_MIN_PRIMARY_YIELD: usize = 10;

const COMMON_NOISE: &[&str] = &["balance", "total", "account", "statement"];

const MONZO_ADDRESS_NOISE: &[&str] = &[
    "flat", "room", "house", "court", "road", "united", "kingdom",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl BankProfile {
    /// Built-in profile for a bank.
    pub fn builtin(bank: Bank) -> Self {
        match bank {
            Bank::Monzo => Self::monzo(),
            Bank::Lloyds => Self::lloyds(),
            Bank::Barclays => Self::barclays(),
        }
    }

    fn monzo() -> Self {
        let mut noise = strings(COMMON_NOISE);
        noise.extend(strings(MONZO_ADDRESS_NOISE));
        BankProfile {
            bank: Bank::Monzo,
            headers: HeaderSynonyms {
                date: strings(&["date", "transaction date", "posted date"]),
                description: strings(&[
                    "description",
                    "transaction description",
                    "details",
                    "name",
                    "memo",
                    "notes",
                ]),
                amount: strings(&["amount", "value", "transaction amount"]),
                debit: strings(&["money out", "debit", "paid out"]),
                credit: strings(&["money in", "credit", "paid in"]),
                balance: strings(&["balance"]),
                category: strings(&["category", "type", "transaction type"]),
            },
            noise_keywords: noise,
            summary_labels: vec![
                SummaryLabel {
                    field: SummaryField::TotalBalanceIncludingPots,
                    label: "Total balance(Including all Pots and Cashback)£".into(),
                },
                SummaryLabel {
                    field: SummaryField::PersonalAccountBalance,
                    label: "Personal Account balance(Excluding all Pots)£".into(),
                },
                SummaryLabel {
                    field: SummaryField::BalanceInPots,
                    label: "Balance in Pots(This includes both Regular Pots with Monzo \
                            and SavingsPots with external providers)£"
                        .into(),
                },
                SummaryLabel {
                    field: SummaryField::CashbackBalance,
                    label: "Cashback Balance-£".into(),
                },
                SummaryLabel {
                    field: SummaryField::TotalOutgoings,
                    label: "Total outgoings+£".into(),
                },
                SummaryLabel {
                    field: SummaryField::TotalDeposits,
                    label: "Total deposits£".into(),
                },
            ],
            pot_markers: strings(&["pot"]),
            date_formats: strings(&["%d/%m/%Y", "%Y-%m-%d"]),
            max_amount: default_max_amount(),
            min_primary_yield: DEFAULT_MIN_PRIMARY_YIELD,
        }
    }

    fn lloyds() -> Self {
        BankProfile {
            bank: Bank::Lloyds,
            headers: HeaderSynonyms {
                date: strings(&["transaction date", "date"]),
                description: strings(&[
                    "transaction description",
                    "transaction details",
                    "description",
                    "details",
                ]),
                amount: strings(&["amount", "value"]),
                debit: strings(&["debit amount", "debit", "paid out"]),
                credit: strings(&["credit amount", "credit", "paid in"]),
                balance: strings(&["balance"]),
                category: strings(&["category"]),
            },
            noise_keywords: strings(COMMON_NOISE),
            summary_labels: Vec::new(),
            pot_markers: strings(&["pot"]),
            date_formats: strings(&["%d/%m/%Y", "%d/%m/%y"]),
            max_amount: default_max_amount(),
            min_primary_yield: DEFAULT_MIN_PRIMARY_YIELD,
        }
    }

    fn barclays() -> Self {
        BankProfile {
            bank: Bank::Barclays,
            headers: HeaderSynonyms {
                date: strings(&["date", "transaction date"]),
                description: strings(&[
                    "memo",
                    "transaction description",
                    "description",
                    "details",
                ]),
                amount: strings(&["amount", "value"]),
                debit: strings(&["debit amount", "debit", "money out"]),
                credit: strings(&["credit amount", "credit", "money in"]),
                balance: strings(&["balance"]),
                category: strings(&["subcategory", "category"]),
            },
            noise_keywords: strings(COMMON_NOISE),
            summary_labels: Vec::new(),
            pot_markers: strings(&["pot"]),
            date_formats: strings(&["%d/%m/%Y", "%d %b %Y"]),
            max_amount: default_max_amount(),
            min_primary_yield: DEFAULT_MIN_PRIMARY_YIELD,
        }
    }

    /// First noise keyword the description contains, if any.
    pub fn noise_keyword_in(&self, description: &str) -> Option<&str> {
        let lower = description.to_lowercase();
        self.noise_keywords
            .iter()
            .map(String::as_str)
            .find(|k| !k.is_empty() && lower.contains(&k.to_lowercase()))
    }
}
