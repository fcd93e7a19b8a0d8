pub mod auth_service;
pub mod fazenda_service;

pub use auth_service::AuthService;
pub use fazenda_service::{FazendaService, HealthReport};
