pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::{InMemoryFazendaRepository, InMemoryUsuarioRepository};
pub use models::{Fazenda, NewFazenda, NewUsuario, Usuario};
pub use postgres::{PgFazendaRepository, PgUsuarioRepository};
pub use repository::{FazendaRepository, UsuarioRepository};
