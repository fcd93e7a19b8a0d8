// Wire shapes exchanged with HTTP clients. Field names are camelCase.
pub mod auth;
pub mod fazenda;
pub mod page;

pub use auth::{AuthResponse, LoginRequest, TokenValidation, ValidateRequest};
pub use fazenda::{FazendaCreateRequest, FazendaResponse, FazendaUpdateRequest};
pub use page::{Page, PageRequest};
