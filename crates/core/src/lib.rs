pub mod bank;
pub mod category;
pub mod money;
pub mod period;
pub mod summary;
pub mod totals;
pub mod transaction;

pub use bank::Bank;
pub use category::Category;
pub use money::Money;
pub use period::DateRange;
pub use summary::{BalanceSummary, SummaryField};
pub use totals::StatementTotals;
pub use transaction::{
    default_max_amount, InvalidTransaction, Transaction, TransactionDraft, TransactionKind,
};
