// handlers/protected/fazendas - /api/v1/fazendas resource
pub mod record;
pub mod schema;
pub mod search;

pub use record::{delete as record_delete, get as record_get, put as record_put};
pub use schema::{get as schema_get, post as schema_post};
pub use search::{by_localizacao, by_nome, by_vacas_min, by_vacas_range, count, exists};
