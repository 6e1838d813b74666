use std::sync::Arc;
use crate::domain::ports::{
    AuthRepository, EmailService, EventRepository, FieldRepository,
    JobRepository, RegistrationRepository, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub field_repo: Arc<dyn FieldRepository>,
    pub registration_repo: Arc<dyn RegistrationRepository>,
    pub job_repo: Arc<dyn JobRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub auth_service: Arc<AuthService>,
    pub email_service: Arc<dyn EmailService>,
    pub templates: Arc<Tera>,
}
