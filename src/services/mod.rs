//! Business logic services

pub mod accounts;
pub mod auth;
pub mod authors;
pub mod catalog;
pub mod circulation;
pub mod payments;

use crate::{
    config::{AuthConfig, PaymentsConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub accounts: accounts::AccountsService,
    pub authors: authors::AuthorsService,
    pub catalog: catalog::CatalogService,
    pub circulation: circulation::CirculationService,
    pub auth: auth::AuthService,
    pub payments: payments::PaymentsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        payments_config: PaymentsConfig,
    ) -> Self {
        Self {
            accounts: accounts::AccountsService::new(repository.clone()),
            authors: authors::AuthorsService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            circulation: circulation::CirculationService::new(repository),
            auth: auth::AuthService::new(auth_config),
            payments: payments::PaymentsService::new(payments_config),
        }
    }
}
