use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tally_core::{Bank, Money};
use thiserror::Error;

use crate::profile::{BankProfile, HeaderSynonyms, SummaryLabel};
use crate::rules::{CategoryRule, CategoryRules};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Invalid setting '{0}': {1}")]
    InvalidSetting(String, String),
}

/// Per-bank overrides. Any field left out keeps the built-in value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOverride {
    pub headers: Option<HeaderSynonyms>,
    pub noise_keywords: Option<Vec<String>>,
    /// Appended to the noise list instead of replacing it.
    pub extra_noise_keywords: Vec<String>,
    pub summary_labels: Option<Vec<SummaryLabel>>,
    pub pot_markers: Option<Vec<String>>,
    pub date_formats: Option<Vec<String>>,
    pub max_amount: Option<Money>,
    pub min_primary_yield: Option<usize>,
}

impl ProfileOverride {
    fn apply(&self, mut profile: BankProfile) -> BankProfile {
        if let Some(h) = &self.headers {
            profile.headers = h.clone();
        }
        if let Some(n) = &self.noise_keywords {
            profile.noise_keywords = n.clone();
        }
        profile
            .noise_keywords
            .extend(self.extra_noise_keywords.iter().cloned());
        if let Some(l) = &self.summary_labels {
            profile.summary_labels = l.clone();
        }
        if let Some(m) = &self.pot_markers {
            profile.pot_markers = m.clone();
        }
        if let Some(f) = &self.date_formats {
            profile.date_formats = f.clone();
        }
        if let Some(max) = self.max_amount {
            profile.max_amount = max;
        }
        if let Some(min) = self.min_primary_yield {
            profile.min_primary_yield = min;
        }
        profile
    }
}

/// Engine configuration, normally read from a TOML file:
///
/// ```toml
/// [profiles.monzo]
/// max_amount = "5000"
/// extra_noise_keywords = ["nottingham"]
///
/// [[rule]]
/// category = "groceries"
/// keywords = ["tesco", "aldi"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub profiles: BTreeMap<Bank, ProfileOverride>,
    /// Replaces the built-in classifier table when present.
    #[serde(rename = "rule")]
    pub rules: Option<Vec<CategoryRule>>,
}

impl EngineConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(toml_content)?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    fn check(&self) -> Result<(), ConfigError> {
        for (bank, o) in &self.profiles {
            if let Some(max) = o.max_amount {
                if !max.is_positive() {
                    return Err(ConfigError::InvalidSetting(
                        format!("profiles.{}.max_amount", bank.to_string().to_lowercase()),
                        format!("must be positive, got {max}"),
                    ));
                }
            }
        }
        if let Some(rules) = &self.rules {
            if rules.is_empty() {
                return Err(ConfigError::InvalidSetting(
                    "rule".to_string(),
                    "at least one rule is required when the table is overridden".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Built-in profile for `bank` with this config's overrides applied.
    pub fn profile(&self, bank: Bank) -> BankProfile {
        let builtin = BankProfile::builtin(bank);
        match self.profiles.get(&bank) {
            Some(o) => o.apply(builtin),
            None => builtin,
        }
    }

    pub fn category_rules(&self) -> CategoryRules {
        match &self.rules {
            Some(rules) => CategoryRules::new(rules.clone()),
            None => CategoryRules::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tally_core::Category;

    #[test]
    fn empty_config_uses_builtins() {
        let config = EngineConfig::from_toml("").unwrap();
        assert_eq!(config.profile(Bank::Monzo), BankProfile::builtin(Bank::Monzo));
        assert_eq!(config.category_rules(), CategoryRules::default());
    }

    #[test]
    fn profile_override_merges_fields() {
        let config = EngineConfig::from_toml(
            r#"
            [profiles.monzo]
            max_amount = "5000"
            min_primary_yield = 3
            extra_noise_keywords = ["nottingham"]
            "#,
        )
        .unwrap();
        let p = config.profile(Bank::Monzo);
        assert_eq!(p.max_amount, Money::from_pence(500_000));
        assert_eq!(p.min_primary_yield, 3);
        assert!(p.noise_keywords.iter().any(|k| k == "balance"));
        assert!(p.noise_keywords.iter().any(|k| k == "nottingham"));
        // Other banks are untouched.
        assert_eq!(config.profile(Bank::Lloyds), BankProfile::builtin(Bank::Lloyds));
    }

    #[test]
    fn rule_table_override() {
        let config = EngineConfig::from_toml(
            r#"
            [[rule]]
            category = "groceries"
            keywords = ["aldi"]
            "#,
        )
        .unwrap();
        let rules = config.category_rules();
        assert_eq!(rules.classify("ALDI 123"), Category::Groceries);
        assert_eq!(rules.classify("Tesco"), Category::Other);
    }

    #[test]
    fn rejects_non_positive_max_amount() {
        let err = EngineConfig::from_toml("[profiles.lloyds]\nmax_amount = \"0\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting(_, _)));
    }

    #[test]
    fn rejects_unknown_bank() {
        assert!(EngineConfig::from_toml("[profiles.hsbc]\nmin_primary_yield = 2\n").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[profiles.barclays]\nmin_primary_yield = 1").unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.profile(Bank::Barclays).min_primary_yield, 1);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = EngineConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
