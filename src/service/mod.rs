//! Store execution for the admin browser and the chat domain.

mod admin;
mod chats;
mod tokens;
mod users;

pub use admin::AdminStore;
pub use chats::{AuthorType, ChatMode, ChatService, MessageDraft, MessageType};
pub use tokens::TokenService;
