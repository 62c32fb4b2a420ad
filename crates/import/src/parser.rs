use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tally_core::{BalanceSummary, Bank, Category, Transaction};

use crate::balance::SummaryPatterns;
use crate::config::EngineConfig;
use crate::csv::{normalize_table, read_header, ColumnMap};
use crate::pdf::{extract_pdf_text, is_pdf};
use crate::profile::BankProfile;
use crate::report::{ExtractionReport, Strategy};
use crate::rules::CategoryRules;
use crate::text::extract_text;

/// Caller's statement about what the input is, skipping detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Tabular,
    Text,
}

/// What the engine took the input to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputShape {
    Tabular,
    Text,
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStatus {
    Parsed,
    NoTransactionsFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    pub transactions: Vec<Transaction>,
    pub balance_summary: BalanceSummary,
    pub status: ParseStatus,
    pub shape: InputShape,
    pub report: ExtractionReport,
}

impl ParseOutcome {
    fn new(
        transactions: Vec<Transaction>,
        balance_summary: BalanceSummary,
        shape: InputShape,
        report: ExtractionReport,
    ) -> Self {
        let status = if transactions.is_empty() {
            ParseStatus::NoTransactionsFound
        } else {
            ParseStatus::Parsed
        };
        ParseOutcome {
            transactions,
            balance_summary,
            status,
            shape,
            report,
        }
    }

    fn unrecognized(min_primary_yield: usize) -> Self {
        Self::new(
            Vec::new(),
            BalanceSummary::new(),
            InputShape::Unrecognized,
            ExtractionReport {
                min_primary_yield,
                ..ExtractionReport::default()
            },
        )
    }
}

struct PreparedProfile {
    profile: BankProfile,
    summary: SummaryPatterns,
}

/// Statement parsing engine. Holds only immutable, precompiled state, so
/// one instance can be shared across threads.
pub struct StatementParser {
    rules: CategoryRules,
    profiles: BTreeMap<Bank, PreparedProfile>,
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl StatementParser {
    pub fn new(config: EngineConfig) -> Self {
        let profiles = Bank::ALL
            .into_iter()
            .map(|bank| {
                let profile = config.profile(bank);
                let summary = SummaryPatterns::compile(&profile.summary_labels);
                (bank, PreparedProfile { profile, summary })
            })
            .collect();
        StatementParser {
            rules: config.category_rules(),
            profiles,
        }
    }

    pub fn profile(&self, bank: Bank) -> BankProfile {
        self.prepared(bank).profile.clone()
    }

    pub fn classify(&self, description: &str) -> Category {
        self.rules.classify(description)
    }

    fn prepared(&self, bank: Bank) -> &PreparedProfile {
        // Every Bank variant is inserted by new().
        &self.profiles[&bank]
    }

    /// Extract every transaction from one statement. PDF input goes through
    /// the text path once its page text is extracted; `declared` only
    /// applies to non-PDF input. Malformed input yields an empty outcome
    /// rather than an error.
    pub fn parse(&self, input: &[u8], bank: Bank, declared: Option<ContentType>) -> ParseOutcome {
        let prepared = self.prepared(bank);
        let profile = &prepared.profile;

        if is_pdf(input) {
            return match extract_pdf_text(input) {
                Ok(text) => self.finish(bank, self.parse_text(&text, prepared)),
                Err(e) => {
                    tracing::warn!(%bank, "unreadable PDF statement: {e}");
                    ParseOutcome::unrecognized(profile.min_primary_yield)
                }
            };
        }

        let decoded = String::from_utf8_lossy(input);
        let text = decoded.trim_start_matches('\u{feff}');

        let content_type = declared.unwrap_or_else(|| detect(text, profile));
        tracing::info!(%bank, ?content_type, declared = declared.is_some(), "parsing statement");
        let outcome = match content_type {
            ContentType::Tabular => self.parse_table(text, profile),
            ContentType::Text => self.parse_text(text, prepared),
        };
        self.finish(bank, outcome)
    }

    fn finish(&self, bank: Bank, outcome: ParseOutcome) -> ParseOutcome {
        if outcome.status == ParseStatus::NoTransactionsFound {
            tracing::warn!(%bank, shape = ?outcome.shape, "no transactions found");
        } else if outcome.report.low_confidence() {
            tracing::warn!(
                %bank,
                accepted = outcome.transactions.len(),
                "fallback extraction found few transactions"
            );
        }
        outcome
    }

    fn parse_table(&self, text: &str, profile: &BankProfile) -> ParseOutcome {
        let mut report = ExtractionReport {
            strategy: Some(Strategy::Tabular),
            min_primary_yield: profile.min_primary_yield,
            ..ExtractionReport::default()
        };
        match normalize_table(text, profile, &self.rules) {
            Ok(table) => {
                report.primary_accepted = table.transactions.len();
                report.rejections = table.rejections;
                let transactions = table.transactions;
                ParseOutcome::new(transactions, BalanceSummary::new(), InputShape::Tabular, report)
            }
            Err(e) => {
                tracing::warn!(bank = %profile.bank, "unusable tabular input: {e}");
                ParseOutcome::new(Vec::new(), BalanceSummary::new(), InputShape::Tabular, report)
            }
        }
    }

    fn parse_text(&self, text: &str, prepared: &PreparedProfile) -> ParseOutcome {
        let profile = &prepared.profile;
        let extraction = extract_text(text, profile);
        let balance_summary = prepared.summary.extract(text);

        let transactions = extraction
            .drafts
            .into_iter()
            .map(|draft| {
                let category = self.rules.classify(&draft.description);
                Transaction::categorized(draft, profile.bank, category)
            })
            .collect();

        let report = ExtractionReport {
            strategy: Some(extraction.strategy),
            primary_accepted: extraction.primary_accepted,
            fallback_accepted: extraction.fallback_accepted,
            min_primary_yield: profile.min_primary_yield,
            rejections: extraction.rejections,
        };
        ParseOutcome::new(transactions, balance_summary, InputShape::Text, report)
    }
}

/// Tabular when the first non-blank record reads as a header naming at
/// least two of the canonical columns; text otherwise. The header is read
/// exactly as the tabular normalizer would read it.
pub fn detect(text: &str, profile: &BankProfile) -> ContentType {
    let headers = match read_header(text) {
        Ok(h) => h,
        Err(_) => return ContentType::Text,
    };
    if headers.len() >= 2 && ColumnMap::resolve(&headers, profile).canonical_matches() >= 2 {
        ContentType::Tabular
    } else {
        ContentType::Text
    }
}

/// Parse with the built-in profiles and rule table.
pub fn parse_statement(input: &[u8], bank: Bank) -> ParseOutcome {
    StatementParser::default().parse(input, bank, None)
}
