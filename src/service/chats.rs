//! Consultation chats, messages, and token billing.

use std::collections::HashMap;

use bson::{doc, oid::ObjectId, Bson, Document};
use chrono::Utc;
use futures::stream::TryStreamExt;
use mongodb::Database;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::service::users;

/// Consultation mode chosen when the chat is opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Two-way consultation with a specialist.
    Between,
    /// One-way venting session.
    Vent,
}

impl ChatMode {
    pub fn parse(raw: &str) -> Option<ChatMode> {
        match raw {
            "between" => Some(ChatMode::Between),
            "vent" => Some(ChatMode::Vent),
            _ => None,
        }
    }

    /// Tokens charged when a regular user opens a chat in this mode.
    pub fn opening_price(self) -> i64 {
        match self {
            ChatMode::Between => 590,
            ChatMode::Vent => 490,
        }
    }
}

/// Billable message type submitted by regular users.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageType {
    InitialBetween,
    InitialVent,
    Additional,
}

impl MessageType {
    pub fn parse(raw: &str) -> Option<MessageType> {
        match raw {
            "initial-between" => Some(MessageType::InitialBetween),
            "initial-vent" => Some(MessageType::InitialVent),
            "additional" => Some(MessageType::Additional),
            _ => None,
        }
    }

    pub fn price(self) -> i64 {
        match self {
            MessageType::InitialBetween => 590,
            MessageType::InitialVent => 490,
            MessageType::Additional => 249,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorType {
    User,
    Specialist,
}

impl AuthorType {
    pub fn parse(raw: &str) -> Option<AuthorType> {
        match raw {
            "user" => Some(AuthorType::User),
            "specialist" => Some(AuthorType::Specialist),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewChat {
    user_email: String,
    mode: ChatMode,
    status: &'static str,
    created_at: bson::DateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewMessage {
    chat_id: ObjectId,
    author_type: AuthorType,
    content: String,
    is_paid: bool,
    /// Stored as submitted; only billable sends validate it against the
    /// known types.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    message_type: Option<String>,
    created_at: bson::DateTime,
}

/// A validated message submission, before billing and persistence.
#[derive(Clone, Debug)]
pub struct MessageDraft {
    pub author_type: AuthorType,
    pub content: String,
    pub is_paid: bool,
    pub message_type: Option<String>,
}

pub struct ChatService;

impl ChatService {
    /// Opens a chat for the caller. Regular users pay the mode's opening
    /// price from their token balance; specialists and staff open for free.
    pub async fn create(db: &Database, email: &str, mode: ChatMode) -> Result<Document, AppError> {
        let user = users::find_by_email(db, email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        if users::role(&user) == "user"
            && users::token_balance(&user) < mode.opening_price() as f64
        {
            return Err(AppError::InsufficientTokens);
        }

        let chat = NewChat {
            user_email: email.to_string(),
            mode,
            status: "open",
            created_at: bson::DateTime::now(),
        };
        let inserted = db.collection::<NewChat>("chats").insert_one(&chat).await?;
        let mut created = bson::to_document(&chat)?;
        created.insert("_id", inserted.inserted_id);
        Ok(created)
    }

    /// The caller's chats, newest first, each enriched with its latest
    /// message. One aggregation over `messages` serves the whole page.
    pub async fn list_for_user(
        db: &Database,
        email: &str,
        status: Option<&str>,
    ) -> Result<Vec<Document>, AppError> {
        let mut filter = doc! { "userEmail": email };
        if let Some(status) = status {
            filter.insert("status", status);
        }
        let chats: Vec<Document> = db
            .collection::<Document>("chats")
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?;
        if chats.is_empty() {
            return Ok(chats);
        }

        let chat_ids: Vec<Bson> = chats.iter().filter_map(|c| c.get("_id").cloned()).collect();
        let pipeline = vec![
            doc! { "$match": { "chatId": { "$in": chat_ids } } },
            doc! { "$sort": { "createdAt": -1 } },
            doc! { "$group": {
                "_id": "$chatId",
                "lastMessage": { "$first": "$content" },
                "lastAuthorType": { "$first": "$authorType" },
                "lastCreatedAt": { "$first": "$createdAt" },
            } },
        ];
        let latest: Vec<Document> = db
            .collection::<Document>("messages")
            .aggregate(pipeline)
            .await?
            .try_collect()
            .await?;
        let mut latest_by_chat: HashMap<ObjectId, Document> = HashMap::new();
        for entry in latest {
            if let Ok(chat_id) = entry.get_object_id("_id") {
                latest_by_chat.insert(chat_id, entry);
            }
        }

        let mut enriched = Vec::with_capacity(chats.len());
        for mut chat in chats {
            let last = chat
                .get_object_id("_id")
                .ok()
                .and_then(|id| latest_by_chat.get(&id));
            let last_message = last
                .and_then(|d| d.get("lastMessage").cloned())
                .unwrap_or(Bson::Null);
            let last_author = last
                .and_then(|d| d.get("lastAuthorType").cloned())
                .unwrap_or(Bson::Null);
            // A chat with no messages sorts by its own creation time.
            let last_created = last
                .and_then(|d| d.get("lastCreatedAt").cloned())
                .or_else(|| chat.get("createdAt").cloned())
                .unwrap_or(Bson::Null);
            chat.insert("lastMessage", last_message);
            chat.insert("lastAuthorType", last_author);
            chat.insert("lastCreatedAt", last_created);
            enriched.push(chat);
        }
        Ok(enriched)
    }

    /// Messages of one chat, oldest first.
    pub async fn messages(db: &Database, chat_id: &ObjectId) -> Result<Vec<Document>, AppError> {
        let messages = db
            .collection::<Document>("messages")
            .find(doc! { "chatId": chat_id })
            .sort(doc! { "createdAt": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(messages)
    }

    /// Appends a message. User-authored messages by regular users are billed
    /// by message type; the balance is decremented before the insert, with
    /// no transaction around the pair.
    pub async fn post_message(
        db: &Database,
        chat_id: ObjectId,
        email: &str,
        draft: MessageDraft,
    ) -> Result<Document, AppError> {
        if draft.author_type == AuthorType::User {
            let user = users::find_by_email(db, email)
                .await?
                .ok_or_else(|| AppError::NotFound("User not found".into()))?;
            if users::role(&user) == "user" {
                let billed = draft
                    .message_type
                    .as_deref()
                    .and_then(MessageType::parse)
                    .ok_or_else(|| AppError::BadRequest("Invalid message type".into()))?;
                if users::token_balance(&user) < billed.price() as f64 {
                    return Err(AppError::InsufficientTokens);
                }
                db.collection::<Document>("users")
                    .update_one(
                        doc! { "email": email },
                        doc! { "$inc": { "tokens": -billed.price() } },
                    )
                    .await?;
            }
        }

        let message = NewMessage {
            chat_id,
            author_type: draft.author_type,
            content: draft.content,
            is_paid: draft.is_paid,
            message_type: draft.message_type,
            created_at: bson::DateTime::now(),
        };
        let inserted = db
            .collection::<NewMessage>("messages")
            .insert_one(&message)
            .await?;
        let mut created = bson::to_document(&message)?;
        created.insert("_id", inserted.inserted_id);
        Ok(created)
    }

    /// Closes open chats whose last activity (latest message, else the chat
    /// itself) is older than the window. Returns how many were closed.
    pub async fn close_stale(db: &Database, window: chrono::Duration) -> Result<u64, AppError> {
        let cutoff = bson::DateTime::from_chrono(Utc::now() - window);
        let pipeline = vec![
            doc! { "$match": { "status": "open" } },
            doc! { "$lookup": {
                "from": "messages",
                "localField": "_id",
                "foreignField": "chatId",
                "as": "messages",
            } },
            doc! { "$addFields": {
                "lastActivityAt": { "$max": [ "$createdAt", { "$max": "$messages.createdAt" } ] },
            } },
            doc! { "$match": { "lastActivityAt": { "$lt": cutoff } } },
            doc! { "$project": { "_id": 1 } },
        ];
        let stale: Vec<Document> = db
            .collection::<Document>("chats")
            .aggregate(pipeline)
            .await?
            .try_collect()
            .await?;
        let ids: Vec<ObjectId> = stale
            .iter()
            .filter_map(|d| d.get_object_id("_id").ok())
            .collect();
        if ids.is_empty() {
            return Ok(0);
        }
        tracing::debug!(stale = ids.len(), "closing stale chats");
        let result = db
            .collection::<Document>("chats")
            .update_many(
                doc! { "_id": { "$in": ids } },
                doc! { "$set": { "status": "closed", "closedAt": bson::DateTime::now() } },
            )
            .await?;
        Ok(result.modified_count)
    }
}
