// handlers/public/auth/mod.rs - Public authentication handlers
//
// Token acquisition and validation endpoints that do not require a token.

pub mod login;    // POST /api/auth/login - authenticate and get JWT
pub mod validate; // POST /api/auth/validate - check a token

pub use login::login_post;
pub use validate::validate_post;
