pub mod fazenda;
pub mod usuario;

pub use fazenda::{Fazenda, NewFazenda};
pub use usuario::{NewUsuario, Usuario};
