//! Confide backend: paid chat-consultation platform with a schema-less
//! admin data browser over MongoDB.

pub mod coerce;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod query;
pub mod resources;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;

pub use coerce::{coerce, coerce_update, CoerceError};
pub use config::Config;
pub use error::{AppError, ConfigError};
pub use extractors::{Role, Session};
pub use query::ListQuery;
pub use resources::ResourceCatalog;
pub use routes::{admin_routes, chat_routes, common_routes, common_routes_with_ready};
pub use service::{AdminStore, ChatService, TokenService};
pub use state::AppState;
