use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid company handle: {0}")]
    InvalidHandle(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Equity must be between 0 and 1.0, got {0}")]
    InvalidEquity(String),

    #[error("minEmployees ({min}) cannot be greater than maxEmployees ({max})")]
    InvertedEmployeeRange { min: i32, max: i32 },
}
