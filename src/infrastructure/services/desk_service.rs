//! Desk service

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ServiceResult;
use crate::domain::cache::{CacheCollection, CacheCollectionExt};
use crate::domain::desk::{Desk, DeskId, validate_desk_name};
use crate::domain::store::{Predicate, Repository};

/// Request for creating a new desk
#[derive(Debug, Clone)]
pub struct CreateDeskRequest {
    pub name: String,
}

/// Request for renaming a desk
#[derive(Debug, Clone)]
pub struct UpdateDeskRequest {
    pub name: String,
}

/// Service for managing desks; same write discipline as roles
#[derive(Debug, Clone)]
pub struct DeskService {
    repository: Repository<Desk>,
    cache: Arc<dyn CacheCollection<Desk>>,
}

impl DeskService {
    pub fn new(repository: Repository<Desk>, cache: Arc<dyn CacheCollection<Desk>>) -> Self {
        Self { repository, cache }
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<Desk>> {
        match self
            .cache
            .get_or_set_all(|| self.repository.select_all())
            .await
        {
            Ok(desks) => ServiceResult::success(desks),
            Err(err) => err.into(),
        }
    }

    pub async fn get_by_id(&self, id: DeskId) -> ServiceResult<Desk> {
        let by_id = Predicate::new("desk id equals", move |desk: &Desk| desk.id() == id);

        let found = self
            .cache
            .get_or_set_first(&by_id, || async move {
                self.repository.select_by_id(&id).await
            })
            .await;

        match found {
            Ok(Some(desk)) => ServiceResult::success(desk),
            Ok(None) => ServiceResult::not_found("no desk under the provided id"),
            Err(err) => err.into(),
        }
    }

    pub async fn create(&self, request: CreateDeskRequest) -> ServiceResult<Desk> {
        if let Err(err) = validate_desk_name(&request.name) {
            return ServiceResult::invalid(err.to_string());
        }

        let name = request.name.clone();
        let same_name = Predicate::new("desk name equals", move |desk: &Desk| {
            desk.name() == name.as_str()
        });

        let existing = match self.repository.where_first(&same_name).await {
            Ok(existing) => existing,
            Err(err) => return err.into(),
        };

        if existing.is_some() {
            return ServiceResult::conflict("desk with this name already exists");
        }

        let desk = match Desk::new(request.name) {
            Ok(desk) => desk,
            Err(err) => return ServiceResult::invalid(err.to_string()),
        };

        info!(id = %desk.id(), name = %desk.name(), "creating desk");

        match self.repository.add(desk).await {
            Some(created) => {
                if let Err(err) = self.cache.insert(created.clone()).await {
                    warn!(error = %err, "failed to mirror created desk into cache");
                }
                ServiceResult::created(created)
            }
            None => ServiceResult::error("cannot create desk, try again later"),
        }
    }

    pub async fn update(&self, id: DeskId, request: UpdateDeskRequest) -> ServiceResult<Desk> {
        if let Err(err) = validate_desk_name(&request.name) {
            return ServiceResult::invalid(err.to_string());
        }

        let mut desk = match self.repository.select_by_id(&id).await {
            Ok(Some(desk)) => desk,
            Ok(None) => return ServiceResult::not_found("no desk under the provided id"),
            Err(err) => return err.into(),
        };

        if desk.name() == request.name {
            return ServiceResult::no_content();
        }

        if let Err(err) = desk.set_name(request.name) {
            return ServiceResult::invalid(err.to_string());
        }

        info!(id = %id, name = %desk.name(), "updating desk");

        if self.repository.update(desk.clone()).await {
            if let Err(err) = self.cache.update(desk.clone()).await {
                warn!(error = %err, "failed to mirror updated desk into cache");
            }
            ServiceResult::success(desk)
        } else {
            ServiceResult::error("cannot update desk, try again later")
        }
    }

    pub async fn remove(&self, id: DeskId) -> ServiceResult<()> {
        let desk = match self.repository.select_by_id(&id).await {
            Ok(Some(desk)) => desk,
            Ok(None) => return ServiceResult::not_found("no desk under the provided id"),
            Err(err) => return err.into(),
        };

        info!(id = %id, "removing desk");

        if self.repository.remove(desk.clone()).await {
            if let Err(err) = self.cache.delete(&desk).await {
                warn!(error = %err, "failed to evict removed desk from cache");
            }
            ServiceResult::no_content()
        } else {
            ServiceResult::error("cannot remove desk, try again later")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::InMemoryCacheCollection;
    use crate::infrastructure::store::InMemoryStore;

    fn service() -> DeskService {
        let store = Arc::new(InMemoryStore::<Desk>::new());
        let cache = Arc::new(InMemoryCacheCollection::<Desk>::new());
        DeskService::new(Repository::new(store), cache)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();

        let created = service
            .create(CreateDeskRequest {
                name: "terrace-1".to_string(),
            })
            .await
            .into_value()
            .unwrap();

        let fetched = service.get_by_id(created.id()).await.into_value().unwrap();
        assert_eq!(fetched.name(), "terrace-1");
    }

    #[tokio::test]
    async fn test_create_duplicate_conflicts() {
        let service = service();

        service
            .create(CreateDeskRequest {
                name: "terrace-1".to_string(),
            })
            .await;

        let second = service
            .create(CreateDeskRequest {
                name: "terrace-1".to_string(),
            })
            .await;
        assert!(matches!(second, ServiceResult::Conflict(_)));
    }

    #[tokio::test]
    async fn test_noop_rename() {
        let service = service();

        let created = service
            .create(CreateDeskRequest {
                name: "terrace-1".to_string(),
            })
            .await
            .into_value()
            .unwrap();

        let result = service
            .update(
                created.id(),
                UpdateDeskRequest {
                    name: "terrace-1".to_string(),
                },
            )
            .await;
        assert_eq!(result, ServiceResult::NoContent);
    }

    #[tokio::test]
    async fn test_rename_and_remove() {
        let service = service();

        let created = service
            .create(CreateDeskRequest {
                name: "terrace-1".to_string(),
            })
            .await
            .into_value()
            .unwrap();

        let renamed = service
            .update(
                created.id(),
                UpdateDeskRequest {
                    name: "terrace-2".to_string(),
                },
            )
            .await
            .into_value()
            .unwrap();
        assert_eq!(renamed.name(), "terrace-2");

        let removed = service.remove(created.id()).await;
        assert_eq!(removed, ServiceResult::NoContent);

        let gone = service.get_by_id(created.id()).await;
        assert!(matches!(gone, ServiceResult::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_all() {
        let service = service();

        service
            .create(CreateDeskRequest {
                name: "terrace-1".to_string(),
            })
            .await;
        service
            .create(CreateDeskRequest {
                name: "window-1".to_string(),
            })
            .await;

        let desks = service.get_all().await.into_value().unwrap();
        assert_eq!(desks.len(), 2);
    }
}
