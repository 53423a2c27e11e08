//! Routers per area; each takes the shared state and is merged in the binary.

pub mod admin;
pub mod chats;
pub mod common;

pub use admin::admin_routes;
pub use chats::chat_routes;
pub use common::{common_routes, common_routes_with_ready};
