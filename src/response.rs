//! Response shapes and document rendering.
//!
//! Stored documents go out as relaxed Extended JSON so the admin browser can
//! see (and later re-submit) typed values like `{"$oid": ...}` without loss.

use bson::{Bson, Document};
use serde::Serialize;
use serde_json::Value;

/// One page of admin list results. `total` is the full match count for the
/// same filter, counted independently of the page window.
#[derive(Serialize)]
pub struct Page {
    pub data: Vec<Value>,
    pub page: i64,
    pub limit: i64,
    pub total: u64,
}

#[derive(Serialize)]
pub struct Success {
    pub success: bool,
}

pub fn success() -> Success {
    Success { success: true }
}

pub fn document_to_json(doc: Document) -> Value {
    Bson::Document(doc).into_relaxed_extjson()
}

pub fn documents_to_json(docs: Vec<Document>) -> Vec<Value> {
    docs.into_iter().map(document_to_json).collect()
}

pub fn bson_to_json(value: Bson) -> Value {
    value.into_relaxed_extjson()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId};

    #[test]
    fn rendering_keeps_type_tags() {
        let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let rendered = document_to_json(doc! { "_id": oid, "name": "ada", "tokens": 100i32 });
        assert_eq!(
            rendered["_id"],
            serde_json::json!({"$oid": "507f1f77bcf86cd799439011"})
        );
        assert_eq!(rendered["name"], serde_json::json!("ada"));
        // Relaxed mode renders plain integers without a wrapper.
        assert_eq!(rendered["tokens"], serde_json::json!(100));
    }
}
