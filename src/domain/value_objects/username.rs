use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Validated username (the users primary key)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    const MAX_LENGTH: usize = 25;

    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() || value.len() > Self::MAX_LENGTH {
            return Err(DomainError::InvalidUsername(format!(
                "Username must be 1-{} characters",
                Self::MAX_LENGTH
            )));
        }

        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            return Err(DomainError::InvalidUsername(
                "Username may only contain letters, digits, '.', '_' and '-'".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}
