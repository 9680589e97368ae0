use std::sync::Arc;
use crate::domain::ports::{
    AuthRepository, LocationRepository, PropertyRepository, UserDirectory,
};
use crate::domain::services::{auth_service::AuthService, navigation::NavigationPolicy};
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub location_repo: Arc<dyn LocationRepository>,
    pub property_repo: Arc<dyn PropertyRepository>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub auth_service: Arc<AuthService>,
    pub navigation: Arc<NavigationPolicy>,
    pub templates: Arc<Tera>,
}
