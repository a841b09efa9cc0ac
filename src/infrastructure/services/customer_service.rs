//! Customer service

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ServiceResult;
use crate::domain::cache::{CacheCollection, CacheCollectionExt};
use crate::domain::customer::{
    Customer, CustomerId, validate_customer_email, validate_customer_name,
};
use crate::domain::store::{Predicate, Repository};

/// Request for registering a new customer
#[derive(Debug, Clone)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
}

/// Request for updating a customer; omitted fields stay unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Service for managing customers.
///
/// Email addresses are the uniqueness key; the duplicate check on creation
/// always runs against the store.
#[derive(Debug, Clone)]
pub struct CustomerService {
    repository: Repository<Customer>,
    cache: Arc<dyn CacheCollection<Customer>>,
}

impl CustomerService {
    pub fn new(
        repository: Repository<Customer>,
        cache: Arc<dyn CacheCollection<Customer>>,
    ) -> Self {
        Self { repository, cache }
    }

    pub async fn get_by_id(&self, id: CustomerId) -> ServiceResult<Customer> {
        let by_id = Predicate::new("customer id equals", move |customer: &Customer| {
            customer.id() == id
        });

        let found = self
            .cache
            .get_or_set_first(&by_id, || async move {
                self.repository.select_by_id(&id).await
            })
            .await;

        match found {
            Ok(Some(customer)) => ServiceResult::success(customer),
            Ok(None) => ServiceResult::not_found("no customer under the provided id"),
            Err(err) => err.into(),
        }
    }

    pub async fn get_by_email(&self, email: &str) -> ServiceResult<Customer> {
        let needle = email.to_string();
        let by_email = Predicate::new("customer email equals", move |customer: &Customer| {
            customer.email() == needle.as_str()
        });

        let found = self
            .cache
            .get_or_set_first(&by_email, || self.repository.where_first(&by_email))
            .await;

        match found {
            Ok(Some(customer)) => ServiceResult::success(customer),
            Ok(None) => ServiceResult::not_found("no customer under the provided email"),
            Err(err) => err.into(),
        }
    }

    pub async fn create(&self, request: CreateCustomerRequest) -> ServiceResult<Customer> {
        if let Err(err) = validate_customer_name(&request.name) {
            return ServiceResult::invalid(err.to_string());
        }
        if let Err(err) = validate_customer_email(&request.email) {
            return ServiceResult::invalid(err.to_string());
        }

        let email = request.email.clone();
        let same_email = Predicate::new("customer email equals", move |customer: &Customer| {
            customer.email() == email.as_str()
        });

        let existing = match self.repository.where_first(&same_email).await {
            Ok(existing) => existing,
            Err(err) => return err.into(),
        };

        if existing.is_some() {
            return ServiceResult::conflict("customer with this email already exists");
        }

        let customer = match Customer::new(request.name, request.email) {
            Ok(customer) => customer,
            Err(err) => return ServiceResult::invalid(err.to_string()),
        };

        info!(id = %customer.id(), "creating customer");

        match self.repository.add(customer).await {
            Some(created) => {
                if let Err(err) = self.cache.insert(created.clone()).await {
                    warn!(error = %err, "failed to mirror created customer into cache");
                }
                ServiceResult::created(created)
            }
            None => ServiceResult::error("cannot create customer, try again later"),
        }
    }

    pub async fn update(
        &self,
        id: CustomerId,
        request: UpdateCustomerRequest,
    ) -> ServiceResult<Customer> {
        if let Some(ref name) = request.name {
            if let Err(err) = validate_customer_name(name) {
                return ServiceResult::invalid(err.to_string());
            }
        }
        if let Some(ref email) = request.email {
            if let Err(err) = validate_customer_email(email) {
                return ServiceResult::invalid(err.to_string());
            }
        }

        let mut customer = match self.repository.select_by_id(&id).await {
            Ok(Some(customer)) => customer,
            Ok(None) => return ServiceResult::not_found("no customer under the provided id"),
            Err(err) => return err.into(),
        };

        let mut changed = false;

        if let Some(name) = request.name {
            if customer.name() != name {
                if let Err(err) = customer.set_name(name) {
                    return ServiceResult::invalid(err.to_string());
                }
                changed = true;
            }
        }

        if let Some(email) = request.email {
            if customer.email() != email {
                if let Err(err) = customer.set_email(email) {
                    return ServiceResult::invalid(err.to_string());
                }
                changed = true;
            }
        }

        if !changed {
            return ServiceResult::no_content();
        }

        info!(id = %id, "updating customer");

        if self.repository.update(customer.clone()).await {
            if let Err(err) = self.cache.update(customer.clone()).await {
                warn!(error = %err, "failed to mirror updated customer into cache");
            }
            ServiceResult::success(customer)
        } else {
            ServiceResult::error("cannot update customer, try again later")
        }
    }

    pub async fn remove(&self, id: CustomerId) -> ServiceResult<()> {
        let customer = match self.repository.select_by_id(&id).await {
            Ok(Some(customer)) => customer,
            Ok(None) => return ServiceResult::not_found("no customer under the provided id"),
            Err(err) => return err.into(),
        };

        info!(id = %id, "removing customer");

        if self.repository.remove(customer.clone()).await {
            if let Err(err) = self.cache.delete(&customer).await {
                warn!(error = %err, "failed to evict removed customer from cache");
            }
            ServiceResult::no_content()
        } else {
            ServiceResult::error("cannot remove customer, try again later")
        }
    }
}
