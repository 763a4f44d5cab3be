use crate::domain::value_objects::CompanyHandle;

/// A company row. `num_employees` and `logo_url` are nullable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub handle: CompanyHandle,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}
