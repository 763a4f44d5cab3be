pub mod auth;
pub mod companies;
pub mod health;
pub mod jobs;
pub mod users;

#[cfg(test)]
mod tests;

pub use auth::{register_handler, token_handler};
pub use companies::{
    create_company_handler, delete_company_handler, get_company_handler, list_companies_handler,
    update_company_handler,
};
pub use health::{health_handler, readiness_handler};
pub use jobs::{
    create_job_handler, delete_job_handler, get_job_handler, list_jobs_handler, update_job_handler,
};
pub use users::{
    create_user_handler, delete_user_handler, get_user_handler, list_users_handler,
    update_user_handler,
};
