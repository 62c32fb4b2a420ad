use serde::{Deserialize, Serialize};
use std::fmt;

/// Bank whose export format produced a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bank {
    Monzo,
    Lloyds,
    Barclays,
}

impl Bank {
    pub const ALL: [Bank; 3] = [Bank::Monzo, Bank::Lloyds, Bank::Barclays];
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bank::Monzo => write!(f, "Monzo"),
            Bank::Lloyds => write!(f, "Lloyds"),
            Bank::Barclays => write!(f, "Barclays"),
        }
    }
}

impl std::str::FromStr for Bank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monzo" => Ok(Bank::Monzo),
            "lloyds" => Ok(Bank::Lloyds),
            "barclays" => Ok(Bank::Barclays),
            other => Err(format!("Unknown bank: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn bank_roundtrip() {
        for bank in Bank::ALL {
            assert_eq!(Bank::from_str(&bank.to_string()).unwrap(), bank);
        }
    }

    #[test]
    fn unknown_bank_is_rejected() {
        assert!(Bank::from_str("hsbc").is_err());
    }
}
