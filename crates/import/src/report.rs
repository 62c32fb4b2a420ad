use serde::Serialize;
use tally_core::InvalidTransaction;

/// Which path produced the returned transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Tabular,
    Primary,
    Fallback,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Tabular => write!(f, "tabular"),
            Strategy::Primary => write!(f, "primary"),
            Strategy::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RejectReason {
    InvalidDate(String),
    MalformedAmount(String),
    /// The row itself could not be read as a CSV record.
    MalformedRow(String),
    /// Segment had fewer than the two numeric tokens a record needs.
    MissingAmounts,
    Noise(String),
    Invalid(String),
}

impl From<InvalidTransaction> for RejectReason {
    fn from(e: InvalidTransaction) -> Self {
        RejectReason::Invalid(e.to_string())
    }
}

/// A candidate that was dropped, kept for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub strategy: Strategy,
    pub excerpt: String,
    pub reason: RejectReason,
}

impl Rejection {
    pub fn new(strategy: Strategy, excerpt: &str, reason: RejectReason) -> Self {
        const MAX_EXCERPT: usize = 80;
        let excerpt = excerpt.trim();
        let excerpt = match excerpt.char_indices().nth(MAX_EXCERPT) {
            Some((idx, _)) => format!("{}…", &excerpt[..idx]),
            None => excerpt.to_string(),
        };
        tracing::debug!(%strategy, %excerpt, ?reason, "candidate rejected");
        Rejection { strategy, excerpt, reason }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub strategy: Option<Strategy>,
    pub primary_accepted: usize,
    /// `None` when the fallback never ran.
    pub fallback_accepted: Option<usize>,
    pub min_primary_yield: usize,
    pub rejections: Vec<Rejection>,
}

impl ExtractionReport {
    /// The fallback ran and still came up short. An empty statement and a
    /// layout neither strategy understands look the same from here.
    pub fn low_confidence(&self) -> bool {
        self.strategy == Some(Strategy::Fallback)
            && self.fallback_accepted.unwrap_or(0) < self.min_primary_yield
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_is_trimmed_and_truncated() {
        let long = "x".repeat(200);
        let r = Rejection::new(Strategy::Primary, &long, RejectReason::MissingAmounts);
        assert_eq!(r.excerpt.chars().count(), 81);
        let noise = RejectReason::Noise("total".into());
        let short = Rejection::new(Strategy::Primary, "  Total  ", noise);
        assert_eq!(short.excerpt, "Total");
    }

    #[test]
    fn low_confidence_only_after_short_fallback() {
        let mut report = ExtractionReport {
            strategy: Some(Strategy::Primary),
            primary_accepted: 12,
            fallback_accepted: None,
            min_primary_yield: 10,
            rejections: vec![],
        };
        assert!(!report.low_confidence());

        report.strategy = Some(Strategy::Fallback);
        report.fallback_accepted = Some(4);
        assert!(report.low_confidence());

        report.fallback_accepted = Some(10);
        assert!(!report.low_confidence());
    }

    #[test]
    fn reasons_serialize_with_kind_tag() {
        let json = serde_json::to_value(RejectReason::MalformedRow("bad quote".into())).unwrap();
        assert_eq!(json["kind"], "malformed_row");
        assert_eq!(json["detail"], "bad quote");
        let json = serde_json::to_value(RejectReason::MissingAmounts).unwrap();
        assert_eq!(json["kind"], "missing_amounts");
    }

    #[test]
    fn invalid_transaction_becomes_reason() {
        let reason: RejectReason = InvalidTransaction::ZeroAmount.into();
        assert_eq!(reason, RejectReason::Invalid("Amount is zero".into()));
    }
}
