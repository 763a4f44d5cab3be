use std::sync::Arc;
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::api::middleware::JwtService;
use crate::api::router::AppState;
use crate::application::{
    ports::{CompanyRepository, JobRepository, PasswordHasher, UserRepository},
    use_cases::{
        AuthenticateUseCase, CreateCompanyUseCase, CreateJobUseCase, CreateUserUseCase,
        DeleteCompanyUseCase, DeleteJobUseCase, DeleteUserUseCase, GetCompanyUseCase,
        GetJobUseCase, GetUserUseCase, ListCompaniesUseCase, ListJobsUseCase, ListUsersUseCase,
        UpdateCompanyUseCase, UpdateJobUseCase, UpdateUserUseCase,
    },
};
use crate::config::Config;
use crate::infrastructure::{
    persistence::{
        PostgresCompanyRepository, PostgresJobRepository, PostgresUserRepository,
        UnknownFilterPolicy,
    },
    security::BcryptPasswordHasher,
};

/// Wires config, pool, repositories and use cases into an [`AppState`]
pub struct ApplicationBuilder {
    config: Config,
    pool: Option<PgPool>,
    company_repo: Option<Arc<dyn CompanyRepository>>,
    job_repo: Option<Arc<dyn JobRepository>>,
    user_repo: Option<Arc<dyn UserRepository>>,
    hasher: Option<Arc<dyn PasswordHasher>>,
}

impl ApplicationBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pool: None,
            company_repo: None,
            job_repo: None,
            user_repo: None,
            hasher: None,
        }
    }

    /// Initialize database connection pool with retry logic
    pub async fn with_database(mut self) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Connecting to database");

        // Retry connection with exponential backoff
        let mut retries = 3;
        let mut delay = Duration::from_secs(1);
        let pool = loop {
            match PgPoolOptions::new()
                .max_connections(self.config.db_max_connections)
                .min_connections(self.config.db_min_connections)
                .acquire_timeout(Duration::from_secs(self.config.db_acquire_timeout_secs))
                .idle_timeout(Some(Duration::from_secs(self.config.db_idle_timeout_secs)))
                .max_lifetime(Some(Duration::from_secs(self.config.db_max_lifetime_secs)))
                .connect(&self.config.database_url)
                .await
            {
                Ok(pool) => break pool,
                Err(e) if retries > 0 => {
                    retries -= 1;
                    warn!(
                        "Database connection failed, retrying in {:?} ({} retries left): {}",
                        delay, retries, e
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => {
                    tracing::error!("Failed to connect to database after retries: {}", e);
                    return Err(Box::new(e));
                }
            }
        };

        info!(
            "Database pool configured: max={}, min={}, acquire_timeout={}s, idle_timeout={}s, max_lifetime={}s",
            self.config.db_max_connections,
            self.config.db_min_connections,
            self.config.db_acquire_timeout_secs,
            self.config.db_idle_timeout_secs,
            self.config.db_max_lifetime_secs
        );

        if self.config.run_migrations {
            info!("Running database migrations");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to run migrations: {}", e);
                    e
                })?;
        }

        self.pool = Some(pool);
        Ok(self)
    }

    /// Use an existing pool; migrations are the caller's business
    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Initialize infrastructure layer (repositories and password hashing)
    pub fn with_infrastructure(mut self) -> Result<Self, Box<dyn std::error::Error>> {
        let pool = self.pool.as_ref().ok_or("Database pool not initialized")?;
        let policy = UnknownFilterPolicy::from_strict(self.config.strict_filters);

        self.company_repo = Some(Arc::new(
            PostgresCompanyRepository::new(pool.clone()).with_filter_policy(policy),
        ));
        self.job_repo = Some(Arc::new(
            PostgresJobRepository::new(pool.clone()).with_filter_policy(policy),
        ));
        self.user_repo = Some(Arc::new(PostgresUserRepository::new(pool.clone())));
        self.hasher = Some(Arc::new(BcryptPasswordHasher::new(self.config.bcrypt_cost)));

        info!(strict_filters = self.config.strict_filters, "Infrastructure layer initialized");
        Ok(self)
    }

    /// Build application state with all use cases
    pub fn build(self) -> Result<AppState, Box<dyn std::error::Error>> {
        let pool = self.pool.ok_or("Database pool not initialized")?;
        let company_repo = self
            .company_repo
            .ok_or("Company repository not initialized")?;
        let job_repo = self.job_repo.ok_or("Job repository not initialized")?;
        let user_repo = self.user_repo.ok_or("User repository not initialized")?;
        let hasher = self.hasher.ok_or("Password hasher not initialized")?;

        if self.config.uses_dev_secret() {
            warn!("JWT_SECRET not set; signing tokens with the development secret");
        }
        let jwt = Arc::new(JwtService::new(
            &self.config.jwt_secret,
            self.config.jwt_expiration_hours,
        ));

        let app_state = AppState {
            pool: Arc::new(pool),
            jwt,
            authenticate_use_case: Arc::new(AuthenticateUseCase::new(
                Arc::clone(&user_repo),
                Arc::clone(&hasher),
            )),
            create_company_use_case: Arc::new(CreateCompanyUseCase::new(Arc::clone(
                &company_repo,
            ))),
            list_companies_use_case: Arc::new(ListCompaniesUseCase::new(Arc::clone(
                &company_repo,
            ))),
            get_company_use_case: Arc::new(GetCompanyUseCase::new(
                Arc::clone(&company_repo),
                Arc::clone(&job_repo),
            )),
            update_company_use_case: Arc::new(UpdateCompanyUseCase::new(Arc::clone(
                &company_repo,
            ))),
            delete_company_use_case: Arc::new(DeleteCompanyUseCase::new(company_repo)),
            create_job_use_case: Arc::new(CreateJobUseCase::new(Arc::clone(&job_repo))),
            list_jobs_use_case: Arc::new(ListJobsUseCase::new(Arc::clone(&job_repo))),
            get_job_use_case: Arc::new(GetJobUseCase::new(Arc::clone(&job_repo))),
            update_job_use_case: Arc::new(UpdateJobUseCase::new(Arc::clone(&job_repo))),
            delete_job_use_case: Arc::new(DeleteJobUseCase::new(job_repo)),
            create_user_use_case: Arc::new(CreateUserUseCase::new(
                Arc::clone(&user_repo),
                Arc::clone(&hasher),
            )),
            list_users_use_case: Arc::new(ListUsersUseCase::new(Arc::clone(&user_repo))),
            get_user_use_case: Arc::new(GetUserUseCase::new(Arc::clone(&user_repo))),
            update_user_use_case: Arc::new(UpdateUserUseCase::new(
                Arc::clone(&user_repo),
                hasher,
            )),
            delete_user_use_case: Arc::new(DeleteUserUseCase::new(user_repo)),
            config: self.config,
        };

        info!("Application layer initialized");
        Ok(app_state)
    }

    /// Get configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
