//! Employee role service

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ServiceResult;
use crate::domain::cache::{CacheCollection, CacheCollectionExt};
use crate::domain::role::{EmployeeRole, RoleId, validate_role_name};
use crate::domain::store::{Predicate, Repository};

/// Request for creating a new employee role
#[derive(Debug, Clone)]
pub struct CreateRoleRequest {
    pub name: String,
}

/// Request for renaming an employee role
#[derive(Debug, Clone)]
pub struct UpdateRoleRequest {
    pub name: String,
}

/// Service for managing employee roles.
///
/// Reads go through the cache-aside collection; every existence check that
/// drives a business decision goes to the store. Writes hit the store first
/// and mirror into the cache only after the transaction committed.
#[derive(Debug, Clone)]
pub struct RoleService {
    repository: Repository<EmployeeRole>,
    cache: Arc<dyn CacheCollection<EmployeeRole>>,
}

impl RoleService {
    pub fn new(
        repository: Repository<EmployeeRole>,
        cache: Arc<dyn CacheCollection<EmployeeRole>>,
    ) -> Self {
        Self { repository, cache }
    }

    /// All roles, populating the cache from the store when cold
    pub async fn get_all(&self) -> ServiceResult<Vec<EmployeeRole>> {
        match self
            .cache
            .get_or_set_all(|| self.repository.select_all())
            .await
        {
            Ok(roles) => ServiceResult::success(roles),
            Err(err) => err.into(),
        }
    }

    /// A single role by id
    pub async fn get_by_id(&self, id: RoleId) -> ServiceResult<EmployeeRole> {
        let by_id = Predicate::new("role id equals", move |role: &EmployeeRole| role.id() == id);

        let found = self
            .cache
            .get_or_set_first(&by_id, || async move {
                self.repository.select_by_id(&id).await
            })
            .await;

        match found {
            Ok(Some(role)) => ServiceResult::success(role),
            Ok(None) => ServiceResult::not_found("no employee role under the provided id"),
            Err(err) => err.into(),
        }
    }

    /// Roles whose name contains the given fragment
    pub async fn get_by_name(&self, name: &str) -> ServiceResult<Vec<EmployeeRole>> {
        let needle = name.to_string();
        let by_name = Predicate::new("role name contains", move |role: &EmployeeRole| {
            role.name().contains(needle.as_str())
        });

        match self
            .cache
            .get_or_set_where(&by_name, || self.repository.where_all(&by_name))
            .await
        {
            Ok(roles) => ServiceResult::success(roles),
            Err(err) => err.into(),
        }
    }

    /// Create a new role; role names are unique
    pub async fn create(&self, request: CreateRoleRequest) -> ServiceResult<EmployeeRole> {
        if let Err(err) = validate_role_name(&request.name) {
            return ServiceResult::invalid(err.to_string());
        }

        // Uniqueness is decided by the store; the cache may lag or be cold.
        let name = request.name.clone();
        let same_name = Predicate::new("role name equals", move |role: &EmployeeRole| {
            role.name() == name.as_str()
        });

        let existing = match self.repository.where_first(&same_name).await {
            Ok(existing) => existing,
            Err(err) => return err.into(),
        };

        if existing.is_some() {
            return ServiceResult::conflict("employee role with this name already exists");
        }

        let role = match EmployeeRole::new(request.name) {
            Ok(role) => role,
            Err(err) => return ServiceResult::invalid(err.to_string()),
        };

        info!(id = %role.id(), name = %role.name(), "creating employee role");

        match self.repository.add(role).await {
            Some(created) => {
                if let Err(err) = self.cache.insert(created.clone()).await {
                    warn!(error = %err, "failed to mirror created role into cache");
                }
                ServiceResult::created(created)
            }
            None => ServiceResult::error("cannot create employee role, try again later"),
        }
    }

    /// Rename a role; renaming to the current name is a no-op
    pub async fn update(&self, id: RoleId, request: UpdateRoleRequest) -> ServiceResult<EmployeeRole> {
        if let Err(err) = validate_role_name(&request.name) {
            return ServiceResult::invalid(err.to_string());
        }

        let mut role = match self.repository.select_by_id(&id).await {
            Ok(Some(role)) => role,
            Ok(None) => return ServiceResult::not_found("no employee role under the provided id"),
            Err(err) => return err.into(),
        };

        if role.name() == request.name {
            return ServiceResult::no_content();
        }

        if let Err(err) = role.set_name(request.name) {
            return ServiceResult::invalid(err.to_string());
        }

        info!(id = %id, name = %role.name(), "updating employee role");

        if self.repository.update(role.clone()).await {
            if let Err(err) = self.cache.update(role.clone()).await {
                warn!(error = %err, "failed to mirror updated role into cache");
            }
            ServiceResult::success(role)
        } else {
            ServiceResult::error("cannot update employee role, try again later")
        }
    }

    /// Remove a role
    pub async fn remove(&self, id: RoleId) -> ServiceResult<()> {
        let role = match self.repository.select_by_id(&id).await {
            Ok(Some(role)) => role,
            Ok(None) => return ServiceResult::not_found("no employee role under the provided id"),
            Err(err) => return err.into(),
        };

        info!(id = %id, "removing employee role");

        if self.repository.remove(role.clone()).await {
            if let Err(err) = self.cache.delete(&role).await {
                warn!(error = %err, "failed to evict removed role from cache");
            }
            ServiceResult::no_content()
        } else {
            ServiceResult::error("cannot remove employee role, try again later")
        }
    }
}
