use tally_core::{Category, Money, Transaction, TransactionDraft};
use thiserror::Error;

use crate::profile::BankProfile;
use crate::report::{RejectReason, Rejection, Strategy};
use crate::rules::CategoryRules;
use crate::util::{find_column, find_columns, normalize_header, parse_date};

#[derive(Error, Debug)]
pub enum TableError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("No header row")]
    NoHeader,
}

/// How a bank's export lays out its money.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountColumns {
    Signed(usize),
    /// Separate debit/credit columns, either of which may be absent.
    Split {
        debit: Option<usize>,
        credit: Option<usize>,
    },
}

/// Header positions resolved against a bank profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: Option<usize>,
    pub description: Option<usize>,
    pub amount: Option<AmountColumns>,
    pub balance: Option<usize>,
    pub category: Vec<usize>,
}

impl ColumnMap {
    pub fn resolve(raw_headers: &[String], profile: &BankProfile) -> Self {
        let headers: Vec<String> = raw_headers.iter().map(|h| normalize_header(h)).collect();
        let syn = &profile.headers;
        let mut taken = Vec::new();

        let date = find_column(&headers, &syn.date, &taken);
        taken.extend(date);
        let debit = find_column(&headers, &syn.debit, &taken);
        taken.extend(debit);
        let credit = find_column(&headers, &syn.credit, &taken);
        taken.extend(credit);
        let balance = find_column(&headers, &syn.balance, &taken);
        taken.extend(balance);
        let signed = find_column(&headers, &syn.amount, &taken);
        taken.extend(signed);
        let description = find_column(&headers, &syn.description, &taken);
        taken.extend(description);
        let category = find_columns(&headers, &syn.category, &taken);

        let amount = match (signed, debit, credit) {
            (Some(col), _, _) => Some(AmountColumns::Signed(col)),
            (None, None, None) => None,
            (None, debit, credit) => Some(AmountColumns::Split { debit, credit }),
        };

        ColumnMap {
            date,
            description,
            amount,
            balance,
            category,
        }
    }

    /// How many of date, description, amount and category were found.
    pub fn canonical_matches(&self) -> usize {
        [
            self.date.is_some(),
            self.description.is_some(),
            self.amount.is_some(),
            !self.category.is_empty(),
        ]
        .into_iter()
        .filter(|found| *found)
        .count()
    }

    fn require(&self) -> Result<(usize, usize, AmountColumns), TableError> {
        let date = self
            .date
            .ok_or_else(|| TableError::MissingColumn("date".to_string()))?;
        let description = self
            .description
            .ok_or_else(|| TableError::MissingColumn("description".to_string()))?;
        let amount = self
            .amount
            .ok_or_else(|| TableError::MissingColumn("amount".to_string()))?;
        Ok((date, description, amount))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOutcome {
    pub transactions: Vec<Transaction>,
    pub rejections: Vec<Rejection>,
}

fn reader(input: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes())
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(|f| f.is_empty())
}

/// First non-blank record, taken as the header row.
fn next_header<I>(records: &mut I) -> Result<Vec<String>, TableError>
where
    I: Iterator<Item = csv::Result<csv::StringRecord>>,
{
    for record in records {
        let record = record?;
        if !is_blank(&record) {
            return Ok(record.iter().map(|s| s.to_string()).collect());
        }
    }
    Err(TableError::NoHeader)
}

/// Header row of `input`, as both format detection and normalization see it.
pub fn read_header(input: &str) -> Result<Vec<String>, TableError> {
    next_header(&mut reader(input).records())
}

/// Turn a tabular export into transactions, keeping row order.
pub fn normalize_table(
    input: &str,
    profile: &BankProfile,
    rules: &CategoryRules,
) -> Result<TableOutcome, TableError> {
    let mut rdr = reader(input);
    let mut records = rdr.records();
    let headers = next_header(&mut records)?;
    let columns = ColumnMap::resolve(&headers, profile);
    let (date_col, desc_col, amount_cols) = columns.require()?;

    let mut outcome = TableOutcome::default();
    for result in records {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                outcome.reject("", RejectReason::MalformedRow(e.to_string()));
                continue;
            }
        };
        if is_blank(&record) {
            continue;
        }
        let cell = |col: usize| record.get(col).unwrap_or_default();

        let Some(date) = parse_date(cell(date_col), &profile.date_formats) else {
            let reason = RejectReason::InvalidDate(cell(date_col).to_string());
            outcome.reject(cell(desc_col), reason);
            continue;
        };
        let description = cell(desc_col);

        let amount = match amount_cols {
            AmountColumns::Signed(col) => Money::parse(cell(col)).ok_or(cell(col)),
            AmountColumns::Split { debit, credit } => {
                let side = |col: Option<usize>| {
                    match col.map(cell).filter(|s| !s.is_empty()) {
                        Some(raw) => Money::parse(raw).map(Money::abs).ok_or(raw),
                        None => Ok(Money::zero()),
                    }
                };
                side(credit).and_then(|c| side(debit).map(|d| c - d))
            }
        };
        let amount = match amount {
            Ok(a) => a,
            Err(raw) => {
                outcome.reject(description, RejectReason::MalformedAmount(raw.to_string()));
                continue;
            }
        };
        let balance = columns.balance.and_then(|col| Money::parse(cell(col)));

        let draft = TransactionDraft::new(date, description, amount, balance);
        if let Err(e) = draft.validate(profile.max_amount) {
            outcome.reject(description, e.into());
            continue;
        }

        let marked_as_pot = columns.category.iter().any(|&col| {
            let value = cell(col).to_lowercase();
            profile
                .pot_markers
                .iter()
                .any(|m| !m.is_empty() && value.contains(&m.to_lowercase()))
        });
        let category = if marked_as_pot {
            Category::PotTransfer
        } else {
            rules.classify(&draft.description)
        };
        outcome
            .transactions
            .push(Transaction::categorized(draft, profile.bank, category));
    }

    tracing::info!(
        bank = %profile.bank,
        accepted = outcome.transactions.len(),
        rejected = outcome.rejections.len(),
        "tabular statement normalized"
    );
    Ok(outcome)
}

impl TableOutcome {
    fn reject(&mut self, excerpt: &str, reason: RejectReason) {
        self.rejections
            .push(Rejection::new(Strategy::Tabular, excerpt, reason));
    }
}
