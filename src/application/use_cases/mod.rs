mod auth;
mod companies;
mod jobs;
mod users;

pub use auth::AuthenticateUseCase;
pub use companies::{
    CreateCompanyUseCase, DeleteCompanyUseCase, GetCompanyUseCase, ListCompaniesUseCase,
    UpdateCompanyUseCase,
};
pub use jobs::{CreateJobUseCase, DeleteJobUseCase, GetJobUseCase, ListJobsUseCase, UpdateJobUseCase};
pub use users::{
    CreateUserUseCase, DeleteUserUseCase, GetUserUseCase, ListUsersUseCase, UpdateUserUseCase,
};
