//! # unixify-db
//!
//! Database layer implementing the registry ports with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Read repositories and the transactional [`PgRegistryStore`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use unixify_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use unixify_db::repositories::PgAccountRepository;
//! use unixify_core::traits::AccountRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     let accounts = PgAccountRepository::new(pool);
//!
//!     let next = accounts.max_uid(unixify_core::IdentityType::People).await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{
    create_pool, create_pool_from_env, run_migrations, run_migrations_from, DatabaseConfig,
    PgPool, MIGRATIONS_DIR,
};
pub use repositories::{
    PgAccountRepository, PgAuditRepository, PgGroupRepository, PgMembershipRepository,
    PgRegistryStore, PgRegistryTransaction, UniqueKey,
};
