use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::Bill;

pub type AccountId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Water,
    Gas,
    Electricity,
}

impl ServiceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Water => "water",
            ServiceCategory::Gas => "gas",
            ServiceCategory::Electricity => "electricity",
        }
    }
}

impl std::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Utility company issuing the bills. Each one serves exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provider {
    Aysam,
    EcogasCuyana,
    Edemsa,
}

/// Display metadata for a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderInfo {
    pub provider: Provider,
    pub code: &'static str,
    pub display_name: &'static str,
    pub category: ServiceCategory,
    pub symbol: &'static str,
}

static PROVIDERS: [ProviderInfo; 3] = [
    ProviderInfo {
        provider: Provider::Aysam,
        code: "AYSAM",
        display_name: "AYSAM",
        category: ServiceCategory::Water,
        symbol: "💧",
    },
    ProviderInfo {
        provider: Provider::EcogasCuyana,
        code: "ECOGAS_CUYANA",
        display_name: "ECOGAS CUYANA",
        category: ServiceCategory::Gas,
        symbol: "🔥",
    },
    ProviderInfo {
        provider: Provider::Edemsa,
        code: "EDEMSA",
        display_name: "EDEMSA",
        category: ServiceCategory::Electricity,
        symbol: "⚡",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown provider '{0}'. Valid providers: AYSAM (water), ECOGAS_CUYANA (gas), EDEMSA (electricity)")]
pub struct ParseProviderError(pub String);

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Aysam, Provider::EcogasCuyana, Provider::Edemsa];

    pub fn info(&self) -> &'static ProviderInfo {
        // Table order matches declaration order
        &PROVIDERS[*self as usize]
    }

    pub fn as_str(&self) -> &'static str {
        self.info().code
    }

    pub fn display_name(&self) -> &'static str {
        self.info().display_name
    }

    pub fn category(&self) -> ServiceCategory {
        self.info().category
    }

    /// Accepts a provider code (`EDEMSA`) or the category it serves (`electricity`).
    pub fn parse(s: &str) -> Result<Self, ParseProviderError> {
        let needle = s.trim();
        PROVIDERS
            .iter()
            .find(|info| {
                info.code.eq_ignore_ascii_case(needle)
                    || info.display_name.eq_ignore_ascii_case(needle)
                    || info.category.as_str().eq_ignore_ascii_case(needle)
            })
            .map(|info| info.provider)
            .ok_or_else(|| ParseProviderError(s.to_string()))
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountNumberError {
    #[error("Account number is required")]
    Empty,

    #[error("Account number must be alphanumeric")]
    InvalidCharacters,
}

/// Utility-assigned account number: ASCII letters, digits and hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountNumber(String);

impl AccountNumber {
    pub fn parse(input: impl Into<String>) -> Result<Self, AccountNumberError> {
        let value = input.into();
        if value.is_empty() {
            return Err(AccountNumberError::Empty);
        }
        if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(AccountNumberError::InvalidCharacters);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountNumber {
    type Error = AccountNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AccountNumber> for String {
    fn from(value: AccountNumber) -> Self {
        value.0
    }
}

impl std::fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user's account with one utility provider and the bills issued against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAccount {
    pub id: AccountId,
    pub provider: Provider,
    pub account_number: AccountNumber,
    pub alias: Option<String>,
    pub bills: Vec<Bill>,
    pub created_at: DateTime<Utc>,
}

impl ServiceAccount {
    pub fn new(provider: Provider, account_number: AccountNumber) -> Self {
        Self {
            id: Uuid::new_v4(),
            provider,
            account_number,
            alias: None,
            bills: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_bills(mut self, bills: Vec<Bill>) -> Self {
        self.bills = bills;
        self
    }

    /// Alias when present, otherwise the account number.
    pub fn label(&self) -> &str {
        self.alias
            .as_deref()
            .unwrap_or_else(|| self.account_number.as_str())
    }
}
