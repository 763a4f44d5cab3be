use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Validated company handle (the companies primary key, e.g. "anderson-arias")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompanyHandle(String);

impl CompanyHandle {
    const MAX_LENGTH: usize = 25;

    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::InvalidHandle(
                "Handle cannot be empty".to_string(),
            ));
        }

        if value.len() > Self::MAX_LENGTH {
            return Err(DomainError::InvalidHandle(format!(
                "Handle too long: {} > {}",
                value.len(),
                Self::MAX_LENGTH
            )));
        }

        if !value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(DomainError::InvalidHandle(
                "Handle must be lowercase alphanumeric with hyphens/underscores".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CompanyHandle {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CompanyHandle> for String {
    fn from(handle: CompanyHandle) -> Self {
        handle.0
    }
}

impl std::fmt::Display for CompanyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CompanyHandle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}
