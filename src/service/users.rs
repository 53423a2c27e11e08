//! Shared helpers over the `users` collection.
//!
//! Role and token balance live directly on the stored user document; chat
//! billing and token purchases both read them through here.

use bson::{doc, Bson, Document};
use mongodb::Database;

use crate::error::AppError;

pub(crate) async fn find_by_email(
    db: &Database,
    email: &str,
) -> Result<Option<Document>, AppError> {
    let user = db
        .collection::<Document>("users")
        .find_one(doc! { "email": email })
        .await?;
    Ok(user)
}

/// Missing or non-string roles count as no role at all.
pub(crate) fn role(user: &Document) -> &str {
    user.get_str("role").unwrap_or("")
}

/// Token balance as stored, whatever numeric width it was written with.
/// Anything non-numeric (or absent) reads as zero.
pub(crate) fn token_balance(user: &Document) -> f64 {
    match user.get("tokens") {
        Some(Bson::Int32(n)) => f64::from(*n),
        Some(Bson::Int64(n)) => *n as f64,
        Some(Bson::Double(n)) => *n,
        _ => 0.0,
    }
}
