mod company_repository;
mod errors;
mod job_repository;
mod password_hasher;
mod user_repository;

pub use company_repository::CompanyRepository;
pub use errors::RepositoryError;
pub use job_repository::JobRepository;
pub use password_hasher::{HashError, PasswordHasher};
pub use user_repository::UserRepository;

#[cfg(test)]
pub use company_repository::MockCompanyRepository;
#[cfg(test)]
pub use job_repository::MockJobRepository;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
#[cfg(test)]
pub use user_repository::MockUserRepository;
