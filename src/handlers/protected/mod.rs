pub mod env;
pub mod fazendas;

pub use env::env_check;
