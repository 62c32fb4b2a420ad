use regex::Regex;
use tally_core::{BalanceSummary, Money, SummaryField};

use crate::profile::{BankProfile, SummaryLabel};

/// Figure following a label, thousands separators allowed: `1,234.56`.
const FIGURE: &str = r"(\d{1,3}(?:,\d{3})*\.\d{2})";

/// One compiled search per labelled aggregate field.
#[derive(Debug, Clone)]
pub struct SummaryPatterns {
    patterns: Vec<(SummaryField, Regex)>,
}

impl SummaryPatterns {
    pub fn compile(labels: &[SummaryLabel]) -> Self {
        let patterns = labels
            .iter()
            .filter_map(|l| {
                let pattern = format!("{}{}", regex::escape(&l.label), FIGURE);
                match Regex::new(&pattern) {
                    Ok(re) => Some((l.field, re)),
                    Err(e) => {
                        tracing::warn!(field = %l.field, "skipping summary label: {e}");
                        None
                    }
                }
            })
            .collect();
        Self { patterns }
    }

    /// Fields whose label is absent from `text` are left out of the result.
    pub fn extract(&self, text: &str) -> BalanceSummary {
        let mut summary = BalanceSummary::new();
        for (field, re) in &self.patterns {
            let value = re
                .captures(text)
                .and_then(|c| c.get(1))
                .and_then(|m| Money::parse(m.as_str()));
            if let Some(value) = value {
                summary.insert(*field, value);
            }
        }
        summary
    }
}

pub fn extract_balance_summary(text: &str, profile: &BankProfile) -> BalanceSummary {
    SummaryPatterns::compile(&profile.summary_labels).extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::Bank;

    const MONZO_HEADER: &str = "Monzo Bank Limited\n\
        Total balance(Including all Pots and Cashback)£2,345.67\n\
        Personal Account balance(Excluding all Pots)£345.67\n\
        Balance in Pots(This includes both Regular Pots with Monzo \
        and SavingsPots with external providers)£2,000.00\n\
        Cashback Balance-£0.00\n\
        Total outgoings+£1,234.56\n\
        Total deposits£3,100.00\n";

    fn monzo() -> BankProfile {
        BankProfile::builtin(Bank::Monzo)
    }

    #[test]
    fn extracts_all_six_fields() {
        let s = extract_balance_summary(MONZO_HEADER, &monzo());
        assert_eq!(s.len(), 6);
        assert_eq!(
            s.get(SummaryField::TotalBalanceIncludingPots),
            Some(Money::from_pence(234_567))
        );
        assert_eq!(s.get(SummaryField::PersonalAccountBalance), Some(Money::from_pence(34_567)));
        assert_eq!(s.get(SummaryField::BalanceInPots), Some(Money::from_pence(200_000)));
        assert_eq!(s.get(SummaryField::CashbackBalance), Some(Money::zero()));
        assert_eq!(s.get(SummaryField::TotalOutgoings), Some(Money::from_pence(123_456)));
        assert_eq!(s.get(SummaryField::TotalDeposits), Some(Money::from_pence(310_000)));
    }

    #[test]
    fn missing_fields_are_absent_not_zero() {
        let s = extract_balance_summary("Total deposits£12.00 and nothing else", &monzo());
        assert_eq!(s.len(), 1);
        assert_eq!(s.get(SummaryField::TotalOutgoings), None);
    }

    #[test]
    fn no_labels_no_summary() {
        let s = extract_balance_summary(MONZO_HEADER, &BankProfile::builtin(Bank::Lloyds));
        assert!(s.is_empty());
    }

    #[test]
    fn label_must_be_followed_by_figure() {
        let s = extract_balance_summary("Total deposits£n/a", &monzo());
        assert!(s.is_empty());
    }

    #[test]
    fn custom_labels_are_escaped() {
        let labels = vec![SummaryLabel {
            field: SummaryField::TotalOutgoings,
            label: "Out (all)+$".to_string(),
        }];
        let s = SummaryPatterns::compile(&labels).extract("Out (all)+$99.10");
        assert_eq!(s.get(SummaryField::TotalOutgoings), Some(Money::from_pence(9910)));
    }
}
