//! Infrastructure module for external services.
//!
//! This module contains the repository trait, its `PostgreSQL` and in-memory
//! implementations, and configuration loading.

pub mod factory;
pub mod in_memory;
pub mod postgres;
pub mod repository;

pub use factory::{
    ConfigurationError, DatabaseConfig, FactoryError, RepositoryFactory, ServerConfig,
    connect_pool,
};
pub use in_memory::InMemoryTaskRepository;
pub use postgres::PostgresTaskRepository;
pub use repository::{RepositoryError, TaskRepository};
