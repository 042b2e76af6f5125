//! Business logic services

pub mod catalog;
pub mod circulation;
pub mod notify;
pub mod students;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub circulation: circulation::CirculationService,
    pub students: students::StudentsService,
}

impl Services {
    /// Create all services with the given repository and notifier
    pub fn new(repository: Repository, notifier: notify::Notifier) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone(), notifier.clone()),
            circulation: circulation::CirculationService::new(repository.clone(), notifier),
            students: students::StudentsService::new(repository),
        }
    }
}
