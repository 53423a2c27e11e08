//! Token purchase crediting. Payment capture happens upstream; by the time
//! this runs the purchase is already settled.

use bson::{doc, Bson, Document};
use mongodb::Database;

use crate::error::AppError;
use crate::service::users;

pub struct TokenService;

impl TokenService {
    /// Credits `amount` tokens to the caller and returns the balance as
    /// stored after the update.
    pub async fn purchase(db: &Database, email: &str, amount: f64) -> Result<Bson, AppError> {
        let user = users::find_by_email(db, email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        let users_coll = db.collection::<Document>("users");
        let id = user
            .get_object_id("_id")
            .map_err(|_| AppError::Internal("Could not update tokens".into()))?;
        let updated = users_coll
            .update_one(doc! { "_id": id }, doc! { "$inc": { "tokens": amount } })
            .await?;
        if updated.matched_count == 0 {
            return Err(AppError::Internal("Could not update tokens".into()));
        }
        tracing::debug!(email = %email, amount, "tokens credited");
        let balance = users_coll
            .find_one(doc! { "_id": id })
            .await?
            .and_then(|u| u.get("tokens").cloned())
            .unwrap_or(Bson::Null);
        Ok(balance)
    }
}
