//! HTTP handlers for the admin browser, chats, messages, and token purchase.

pub mod admin;
pub mod chats;
pub mod messages;
pub mod tokens;
