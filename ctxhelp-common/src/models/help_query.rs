use serde::Serialize;

use crate::error::Error;
use crate::models::context_help::normalize_key;

/// The page context a help lookup is made for.
///
/// Built only through [`HelpQuery::new`], so a query always carries a
/// non-blank controller and already-normalized optional parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpQuery {
    controller: String,
    action: Option<String>,
    property: Option<String>,
}

impl HelpQuery {
    pub fn new(
        controller: &str,
        action: Option<&str>,
        property: Option<&str>,
    ) -> Result<Self, Error> {
        if controller.trim().is_empty() {
            return Err(Error::InvalidQuery("controller name is required".into()));
        }
        Ok(Self {
            controller: controller.to_string(),
            action: normalize_key(action),
            property: normalize_key(property),
        })
    }

    /// Page-level lookup (no field).
    pub fn page(controller: &str, action: Option<&str>) -> Result<Self, Error> {
        Self::new(controller, action, None)
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }
}
