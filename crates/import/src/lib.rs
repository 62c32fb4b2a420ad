pub mod balance;
pub mod config;
pub mod csv;
pub mod parser;
pub mod pdf;
pub mod profile;
pub mod report;
pub mod rules;
pub mod text;
pub(crate) mod util;

pub use balance::{extract_balance_summary, SummaryPatterns};
pub use config::{ConfigError, EngineConfig, ProfileOverride};
pub use csv::{normalize_table, AmountColumns, ColumnMap, TableError, TableOutcome};
pub use parser::{
    detect, parse_statement, ContentType, InputShape, ParseOutcome, ParseStatus, StatementParser,
};
pub use pdf::{extract_pdf_text, PdfError};
pub use profile::{BankProfile, HeaderSynonyms, SummaryLabel, DEFAULT_MIN_PRIMARY_YIELD};
pub use report::{ExtractionReport, RejectReason, Rejection, Strategy};
pub use rules::{classify, CategoryRule, CategoryRules, DEFAULT_RULES};
pub use text::{
    extract_text, fallback_candidates, primary_candidates, select_strategy, StrategyYield,
    TextExtraction,
};
