//! Domain services - orchestration of validation, store writes, and cache mirroring

mod customer_service;
mod desk_service;
mod role_service;

pub use customer_service::{CreateCustomerRequest, CustomerService, UpdateCustomerRequest};
pub use desk_service::{CreateDeskRequest, DeskService, UpdateDeskRequest};
pub use role_service::{CreateRoleRequest, RoleService, UpdateRoleRequest};
