//! Generic document operations behind the admin browser.
//!
//! Every function takes the collection name already vetted by the catalog;
//! nothing here decides authorization.

use bson::{doc, oid::ObjectId, Document};
use futures::stream::TryStreamExt;
use mongodb::Database;

use crate::error::AppError;
use crate::query::ListQuery;

pub struct AdminStore;

impl AdminStore {
    /// One page of matches plus the total count for the same filter. The
    /// count runs as its own query, so it can drift from the page under
    /// concurrent writes.
    pub async fn list(
        db: &Database,
        collection: &str,
        query: &ListQuery,
    ) -> Result<(Vec<Document>, u64), AppError> {
        tracing::debug!(
            collection = %collection,
            filter = ?query.filter,
            page = query.page,
            limit = query.limit,
            "admin list"
        );
        let coll = db.collection::<Document>(collection);
        let mut find = coll
            .find(query.filter.clone())
            .skip(query.skip)
            .limit(query.limit);
        if let Some(sort) = &query.sort {
            find = find.sort(sort.clone());
        }
        let data: Vec<Document> = find.await?.try_collect().await?;
        let total = coll.count_documents(query.filter.clone()).await?;
        Ok((data, total))
    }

    pub async fn find_by_id(
        db: &Database,
        collection: &str,
        id: &ObjectId,
    ) -> Result<Option<Document>, AppError> {
        let found = db
            .collection::<Document>(collection)
            .find_one(doc! { "_id": id })
            .await?;
        Ok(found)
    }

    /// Applies a pre-validated `$set`. Returns false when no document
    /// matched, which can happen if it was deleted after the fetch.
    pub async fn update_by_id(
        db: &Database,
        collection: &str,
        id: &ObjectId,
        set: Document,
    ) -> Result<bool, AppError> {
        tracing::debug!(collection = %collection, id = %id, fields = set.len(), "admin update");
        let result = db
            .collection::<Document>(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await?;
        Ok(result.matched_count > 0)
    }

    pub async fn delete_by_id(
        db: &Database,
        collection: &str,
        id: &ObjectId,
    ) -> Result<bool, AppError> {
        tracing::debug!(collection = %collection, id = %id, "admin delete");
        let result = db
            .collection::<Document>(collection)
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(result.deleted_count > 0)
    }
}
