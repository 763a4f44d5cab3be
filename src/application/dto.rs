use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::domain::entities::{Company, Job, User};
use crate::domain::value_objects::UpdatePayload;

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in patch bodies.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// A patch body along with the order its keys were sent in. The order decides
/// `$n` numbering in the generated `SET` clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedPatch<T> {
    pub patch: T,
    pub key_order: Vec<String>,
}

impl<T> From<T> for OrderedPatch<T> {
    fn from(patch: T) -> Self {
        Self {
            patch,
            key_order: Vec::new(),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for OrderedPatch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let body = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        let key_order = body.keys().cloned().collect();
        let patch = serde_json::from_value(serde_json::Value::Object(body))
            .map_err(serde::de::Error::custom)?;
        Ok(Self { patch, key_order })
    }
}

impl<T: Validate> Validate for OrderedPatch<T> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.patch.validate()
    }
}

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDto {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl From<Company> for CompanyDto {
    fn from(company: Company) -> Self {
        Self {
            handle: company.handle.into(),
            name: company.name,
            description: company.description,
            num_employees: company.num_employees,
            logo_url: company.logo_url,
        }
    }
}

/// A job as listed under its company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyJobDto {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    #[schema(value_type = Option<String>, example = "0.02")]
    pub equity: Option<Decimal>,
}

impl From<Job> for CompanyJobDto {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetailDto {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
    pub jobs: Vec<CompanyJobDto>,
}

impl CompanyDetailDto {
    pub fn new(company: Company, jobs: Vec<Job>) -> Self {
        let company = CompanyDto::from(company);
        Self {
            handle: company.handle,
            name: company.name,
            description: company.description,
            num_employees: company.num_employees,
            logo_url: company.logo_url,
            jobs: jobs.into_iter().map(CompanyJobDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompanyRequest {
    #[validate(length(min = 1, max = 25))]
    pub handle: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: String,
    #[validate(range(min = 0))]
    pub num_employees: Option<i32>,
    #[validate(url)]
    pub logo_url: Option<String>,
}

/// Partial company update; handle is immutable
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyPatch {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(range(min = 0))]
    #[schema(value_type = Option<i32>)]
    pub num_employees: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(url)]
    #[schema(value_type = Option<String>)]
    pub logo_url: Option<Option<String>>,
}

impl CompanyPatch {
    /// Keys are application-level names; the repository maps them to columns.
    pub fn into_payload(self) -> UpdatePayload {
        let mut payload = UpdatePayload::new();
        payload
            .set_some("name", self.name)
            .set_some("description", self.description)
            .set_some("numEmployees", self.num_employees)
            .set_some("logoUrl", self.logo_url);
        payload
    }
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobDto {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    #[schema(value_type = Option<String>, example = "0.02")]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl From<Job> for JobDto {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
            company_handle: job.company_handle.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJobRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(range(min = 0))]
    pub salary: Option<i32>,
    #[schema(value_type = Option<String>, example = "0.02")]
    pub equity: Option<Decimal>,
    #[validate(length(min = 1, max = 25))]
    pub company_handle: String,
}

/// Partial job update; id and company are immutable
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobPatch {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(range(min = 0))]
    #[schema(value_type = Option<i32>)]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub equity: Option<Option<Decimal>>,
}

impl JobPatch {
    pub fn into_payload(self) -> UpdatePayload {
        let mut payload = UpdatePayload::new();
        payload
            .set_some("title", self.title)
            .set_some("salary", self.salary)
            .set_some("equity", self.equity);
        payload
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            username: user.username.into(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

/// Self-service signup; never grants admin
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 25))]
    pub username: String,
    #[validate(length(min = 5, max = 20))]
    pub password: String,
    #[validate(length(min = 1, max = 25))]
    pub first_name: String,
    #[validate(length(min = 1, max = 25))]
    pub last_name: String,
    #[validate(email, length(min = 6, max = 60))]
    pub email: String,
}

/// Admin-created user, optionally an admin
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUserRequest {
    #[validate(length(min = 1, max = 25))]
    pub username: String,
    #[validate(length(min = 5, max = 20))]
    pub password: String,
    #[validate(length(min = 1, max = 25))]
    pub first_name: String,
    #[validate(length(min = 1, max = 25))]
    pub last_name: String,
    #[validate(email, length(min = 6, max = 60))]
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl From<RegisterRequest> for NewUserRequest {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            is_admin: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    #[validate(length(min = 1, max = 25))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 25))]
    pub last_name: Option<String>,
    #[validate(email, length(min = 6, max = 60))]
    pub email: Option<String>,
    #[validate(length(min = 5, max = 20))]
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

impl UserPatch {
    /// Plain-text password is left out; the use case adds the hash.
    pub fn into_payload_without_password(self) -> (UpdatePayload, Option<String>) {
        let mut payload = UpdatePayload::new();
        payload
            .set_some("firstName", self.first_name)
            .set_some("lastName", self.last_name)
            .set_some("email", self.email)
            .set_some("isAdmin", self.is_admin);
        (payload, self.password)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 25))]
    pub username: String,
    #[validate(length(min = 1, max = 20))]
    pub password: String,
}
