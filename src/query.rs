//! List query construction for the admin browser.
//!
//! A raw query-string map becomes a store filter plus paging and sort. The
//! search mode (`field` + `q`) matches one term against every plausible typed
//! interpretation at once, because a schema-less store cannot tell us whether
//! `"42"` lives in the collection as a string, a number, or something else.

use std::collections::HashMap;
use std::sync::LazyLock;

use bson::{Bson, Document};

use crate::coerce::parse_date_str;

/// Query parameters with dedicated meaning; anything else becomes an
/// exact-match filter entry.
const RESERVED_PARAMS: &[&str] = &["page", "limit", "sort", "order", "field", "q"];

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;

static OBJECT_ID_HEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new("^[0-9a-fA-F]{24}$").unwrap());

#[derive(Clone, Debug)]
pub struct ListQuery {
    pub filter: Document,
    pub sort: Option<Document>,
    pub page: i64,
    pub limit: i64,
    pub skip: u64,
}

impl ListQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let page = int_param(params.get("page"), DEFAULT_PAGE).max(1);
        let limit = int_param(params.get("limit"), DEFAULT_LIMIT).max(1);
        let skip = (page - 1).saturating_mul(limit) as u64;

        let field = params.get("field").filter(|v| !v.is_empty());
        let term = params.get("q").filter(|v| !v.is_empty());
        let filter = match (field, term) {
            (Some(field), Some(term)) => search_filter(field, term),
            _ => exact_filter(params),
        };

        let sort = params.get("sort").filter(|v| !v.is_empty()).map(|field| {
            let direction: i32 = match params.get("order").map(String::as_str) {
                Some("desc") => -1,
                _ => 1,
            };
            let mut sort = Document::new();
            sort.insert(field, direction);
            sort
        });

        ListQuery {
            filter,
            sort,
            page,
            limit,
            skip,
        }
    }
}

/// One `$or` across every typed reading of the term. The case-insensitive
/// regex branch is always present; the others join when the term parses.
fn search_filter(field: &str, term: &str) -> Document {
    let mut branches = vec![branch(
        field,
        Bson::RegularExpression(bson::Regex {
            pattern: term.to_string(),
            options: "i".to_string(),
        }),
    )];
    if let Ok(n) = term.trim().parse::<f64>() {
        if n.is_finite() {
            branches.push(branch(field, Bson::Double(n)));
        }
    }
    match term.to_lowercase().as_str() {
        "true" => branches.push(branch(field, Bson::Boolean(true))),
        "false" => branches.push(branch(field, Bson::Boolean(false))),
        _ => {}
    }
    if let Some(dt) = parse_date_str(term) {
        branches.push(branch(field, Bson::DateTime(dt)));
    }
    if OBJECT_ID_HEX.is_match(term) {
        if let Ok(oid) = bson::oid::ObjectId::parse_str(term) {
            branches.push(branch(field, Bson::ObjectId(oid)));
        }
    }
    let mut filter = Document::new();
    filter.insert("$or", branches);
    filter
}

fn branch(field: &str, value: Bson) -> Bson {
    let mut d = Document::new();
    d.insert(field, value);
    Bson::Document(d)
}

/// Every non-reserved parameter ANDs an equality on its raw string value.
fn exact_filter(params: &HashMap<String, String>) -> Document {
    let mut filter = Document::new();
    for (key, value) in params {
        if !RESERVED_PARAMS.contains(&key.as_str()) {
            filter.insert(key, value.clone());
        }
    }
    filter
}

fn int_param(raw: Option<&String>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
