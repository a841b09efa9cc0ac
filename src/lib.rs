//! Restaurant API data-access layer
//!
//! The cache-aside core of a restaurant-management backend:
//! - Generic repository with transactional write semantics over a
//!   pluggable relational store (in-memory or PostgreSQL)
//! - Cache-aside coordination keeping an indexed secondary cache
//!   (in-memory or Redis) consistent with the store
//! - Domain services for roles, desks, and customers returning
//!   discriminated results for controllers to translate
//!
//! HTTP routing, request parsing, and authentication are external
//! consumers of [`AppState`].

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use self::config::AppConfig;
pub use domain::{
    CacheCollection, CacheCollectionExt, Customer, CustomerId, Desk, DeskId, DomainError,
    EmployeeRole, Predicate, Repository, RoleId, ServiceResult, Store, StoreEntity, StoreKey,
};
pub use infrastructure::services::{CustomerService, DeskService, RoleService};

use std::sync::Arc;

use tracing::info;

use infrastructure::cache::{CacheConfig, CacheFactory};
use infrastructure::store::{StoreConfig, StoreFactory};

/// The wired data-access services, one handle per entity kind
#[derive(Debug, Clone)]
pub struct AppState {
    pub roles: Arc<RoleService>,
    pub desks: Arc<DeskService>,
    pub customers: Arc<CustomerService>,
}

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration.
///
/// All wiring is explicit: stores are connected, cache collections are
/// declared, and services are assembled here, once, from already
/// constructed dependencies.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let store_config = StoreConfig::from_settings(&config.store)?;
    let cache_config = CacheConfig::from_settings(&config.cache)?;

    info!(
        store = ?store_config.backend(),
        cache = ?cache_config.backend(),
        "wiring data access layer"
    );

    let role_store = StoreFactory::create::<EmployeeRole>(&store_config, "employee_roles").await?;
    let desk_store = StoreFactory::create::<Desk>(&store_config, "desks").await?;
    let customer_store = StoreFactory::create::<Customer>(&store_config, "customers").await?;

    let role_cache = CacheFactory::create::<EmployeeRole>(&cache_config, "employee-roles").await?;
    let desk_cache = CacheFactory::create::<Desk>(&cache_config, "desks").await?;
    let customer_cache = CacheFactory::create::<Customer>(&cache_config, "customers").await?;

    Ok(AppState {
        roles: Arc::new(RoleService::new(Repository::new(role_store), role_cache)),
        desks: Arc::new(DeskService::new(Repository::new(desk_store), desk_cache)),
        customers: Arc::new(CustomerService::new(
            Repository::new(customer_store),
            customer_cache,
        )),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::services::{CreateDeskRequest, CreateRoleRequest};

    #[tokio::test]
    async fn test_create_app_state_defaults_to_memory_backends() {
        let state = create_app_state().await.unwrap();

        let created = state
            .roles
            .create(CreateRoleRequest {
                name: "waiter".to_string(),
            })
            .await;
        assert!(matches!(created, ServiceResult::Created(_)));

        let desks = state
            .desks
            .create(CreateDeskRequest {
                name: "terrace-1".to_string(),
            })
            .await;
        assert!(matches!(desks, ServiceResult::Created(_)));
    }

    #[tokio::test]
    async fn test_create_app_state_rejects_unknown_backend() {
        let mut config = AppConfig::default();
        config.store.backend = "cassandra".to_string();

        let result = create_app_state_with_config(&config).await;
        assert!(result.is_err());
    }
}
