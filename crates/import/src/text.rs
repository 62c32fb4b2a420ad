use std::sync::OnceLock;

use regex::Regex;
use tally_core::{Money, TransactionDraft};

use crate::profile::BankProfile;
use crate::report::{RejectReason, Rejection, Strategy};
use crate::util::parse_date;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// Date, lazily matched description, then amount and balance glued together:
// "01/01/2024Tesco Store-12.501000.00".
re!(re_record,
    r"(\d{2}/\d{2}/\d{4})([A-Za-z0-9\s.\-()/\&'*]+?)(-?\d+\.\d{2})(-?\d+\.\d{2})");
re!(re_date_token,
    r"\d{2}/\d{2}/\d{4}");
re!(re_decimal_token,
    r"-?\d+\.\d{2}");

// ── Strategy output ──────────────────────────────────────────────────────────

/// Accepted drafts plus what was dropped along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyYield {
    pub drafts: Vec<TransactionDraft>,
    pub rejections: Vec<Rejection>,
}

impl StrategyYield {
    pub fn accepted(&self) -> usize {
        self.drafts.len()
    }

    fn consider(
        &mut self,
        strategy: Strategy,
        profile: &BankProfile,
        date: &str,
        description: &str,
        amount: &str,
        balance: &str,
    ) {
        let description = description.trim();
        let Some(date) = parse_date(date, &profile.date_formats) else {
            self.reject(strategy, date, RejectReason::InvalidDate(date.to_string()));
            return;
        };
        let Some(amount) = Money::parse(amount) else {
            self.reject(strategy, description, RejectReason::MalformedAmount(amount.to_string()));
            return;
        };
        let balance = Money::parse(balance);

        let draft = TransactionDraft::new(date, description, amount, balance);
        if let Err(e) = draft.validate(profile.max_amount) {
            self.reject(strategy, description, e.into());
            return;
        }
        if let Some(keyword) = profile.noise_keyword_in(description) {
            self.reject(strategy, description, RejectReason::Noise(keyword.to_string()));
            return;
        }
        self.drafts.push(draft);
    }

    fn reject(&mut self, strategy: Strategy, excerpt: &str, reason: RejectReason) {
        self.rejections.push(Rejection::new(strategy, excerpt, reason));
    }
}

// ── Strategies ───────────────────────────────────────────────────────────────

/// Single forward scan for `date description amount balance` records,
/// non-overlapping, in order of appearance.
pub fn primary_candidates(text: &str, profile: &BankProfile) -> StrategyYield {
    let mut out = StrategyYield::default();
    for c in re_record().captures_iter(text) {
        let field = |i: usize| c.get(i).map_or("", |m| m.as_str());
        out.consider(Strategy::Primary, profile, field(1), field(2), field(3), field(4));
    }
    out
}

/// Cut the text at every date token; inside each segment the first two
/// decimal tokens are amount and balance, and whatever precedes the first
/// one is the description.
pub fn fallback_candidates(text: &str, profile: &BankProfile) -> StrategyYield {
    let mut out = StrategyYield::default();
    let dates: Vec<regex::Match<'_>> = re_date_token().find_iter(text).collect();

    for (i, date) in dates.iter().enumerate() {
        let end = dates.get(i + 1).map_or(text.len(), |next| next.start());
        let segment = &text[date.end()..end];

        let mut numbers = re_decimal_token().find_iter(segment);
        let (Some(amount), Some(balance)) = (numbers.next(), numbers.next()) else {
            out.reject(Strategy::Fallback, segment, RejectReason::MissingAmounts);
            continue;
        };
        let description = &segment[..amount.start()];
        out.consider(
            Strategy::Fallback,
            profile,
            date.as_str(),
            description,
            amount.as_str(),
            balance.as_str(),
        );
    }
    out
}

// ── Strategy selection ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextExtraction {
    pub strategy: Strategy,
    pub drafts: Vec<TransactionDraft>,
    pub primary_accepted: usize,
    pub fallback_accepted: Option<usize>,
    pub rejections: Vec<Rejection>,
}

/// Keep the primary yield when it reaches `min_yield`; otherwise run the
/// fallback and return its output instead. The two are never merged.
pub fn select_strategy<F>(primary: StrategyYield, fallback: F, min_yield: usize) -> TextExtraction
where
    F: FnOnce() -> StrategyYield,
{
    let primary_accepted = primary.accepted();
    if primary_accepted >= min_yield {
        tracing::info!(accepted = primary_accepted, "primary text strategy selected");
        return TextExtraction {
            strategy: Strategy::Primary,
            drafts: primary.drafts,
            primary_accepted,
            fallback_accepted: None,
            rejections: primary.rejections,
        };
    }

    let fallback = fallback();
    let fallback_accepted = fallback.accepted();
    tracing::info!(
        primary = primary_accepted,
        fallback = fallback_accepted,
        min_yield,
        "primary text strategy under-yielded, using fallback"
    );
    let mut rejections = primary.rejections;
    rejections.extend(fallback.rejections);
    TextExtraction {
        strategy: Strategy::Fallback,
        drafts: fallback.drafts,
        primary_accepted,
        fallback_accepted: Some(fallback_accepted),
        rejections,
    }
}

pub fn extract_text(text: &str, profile: &BankProfile) -> TextExtraction {
    select_strategy(
        primary_candidates(text, profile),
        || fallback_candidates(text, profile),
        profile.min_primary_yield,
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
