//! Allow-listed resource catalog for the admin browser.
//!
//! Every admin route resolves its `:resource` segment through here before any
//! store call; a name that is not on the list never reaches the driver.

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct ResourceCatalog {
    names: Vec<String>,
}

impl ResourceCatalog {
    /// Built once at startup from `Config::allowed_collections`.
    pub fn new(names: Vec<String>) -> Self {
        if names.is_empty() {
            tracing::warn!("no admin collections configured; admin routes will refuse requests");
        }
        ResourceCatalog { names }
    }

    /// Exact, case-sensitive membership check. The returned name is the
    /// catalog's own copy and is safe to hand to the store driver.
    pub fn authorize<'a>(&'a self, resource: &str) -> Result<&'a str, AppError> {
        if self.names.is_empty() {
            return Err(AppError::Misconfigured);
        }
        self.names
            .iter()
            .find(|name| *name == resource)
            .map(String::as_str)
            .ok_or(AppError::InvalidResource)
    }

    /// All catalog entries, in configured order.
    pub fn names(&self) -> Result<&[String], AppError> {
        if self.names.is_empty() {
            return Err(AppError::Misconfigured);
        }
        Ok(&self.names)
    }
}
