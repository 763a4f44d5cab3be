//! # Jobboard - Companies, Jobs and Users over Postgres
//!
//! An HTTP backend for a job board built on Clean Architecture principles.
//!
//! ## Architecture Layers
//!
//! - **Domain**: Core business logic (entities, value objects, domain errors)
//! - **Application**: Use cases and ports (interfaces)
//! - **Infrastructure**: Postgres repositories, SQL clause builders, password hashing
//! - **API**: HTTP handlers and middleware
//!
//! ## Key Features
//!
//! - Partial updates from sparse payloads via a parameterized `SET` builder
//! - Filtered listings via a table-driven `WHERE` builder
//! - JWT authentication with admin and same-user guards
//!
//! ## Example Usage
//!
//! ```no_run
//! use jobboard::infrastructure::persistence::{build_set_clause, COMPANY_COLUMNS};
//! use jobboard::value_objects::UpdatePayload;
//!
//! let mut payload = UpdatePayload::new();
//! payload.set("numEmployees", 42);
//!
//! let clause = build_set_clause(&payload, &COMPANY_COLUMNS).unwrap();
//! assert_eq!(clause.sql, r#""num_employees"=$1"#);
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export key types explicitly to avoid ambiguity
pub use api::errors as api_errors;
pub use application::{dto, ports, use_cases};
pub use config::Config;
pub use domain::errors as domain_errors;
pub use domain::{entities, value_objects};
