use rust_decimal::Decimal;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::CompanyHandle;

/// A job posting belonging to a company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: CompanyHandle,
}

impl Job {
    /// Equity is a fraction of the company, stored as NUMERIC in [0, 1].
    pub fn check_equity(equity: Decimal) -> Result<Decimal, DomainError> {
        if equity.is_sign_negative() || equity > Decimal::ONE {
            return Err(DomainError::InvalidEquity(equity.to_string()));
        }
        Ok(equity)
    }
}

/// Job fields supplied on creation; the id is assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: CompanyHandle,
}
