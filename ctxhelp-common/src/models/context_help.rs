use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Maximum length of the `controller`, `action` and `property` columns.
pub const MAX_KEY_LEN: usize = 100;

/// One help entry, keyed by (controller, action, property).
///
/// `action == None` applies to every action of the controller, and
/// `property == None` applies to the page as a whole rather than one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextHelp {
    pub context_help_id: i32,
    pub controller: String,
    pub action: Option<String>,
    pub property: Option<String>,

    /// Popover body. May contain markup.
    pub help_text: Option<String>,
    pub tooltip: Option<String>,
}

/// Everything a caller supplies when creating or editing an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContextHelp {
    pub controller: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub help_text: Option<String>,
    #[serde(default)]
    pub tooltip: Option<String>,
}

/// Null and blank are the same thing for every optional key.
pub fn normalize_key(value: Option<&str>) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v.to_string()),
        _ => None,
    }
}

/// Like [`normalize_key`] but for free text: blank text is stored as null.
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_key_len(field: &str, value: Option<&str>) -> Result<(), Error> {
    if let Some(v) = value {
        if v.chars().count() > MAX_KEY_LEN {
            return Err(Error::Validation(format!(
                "{field} must be at most {MAX_KEY_LEN} characters"
            )));
        }
    }
    Ok(())
}

impl NewContextHelp {
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            ..Default::default()
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Validates the field rules and folds blank optionals into `None`.
    pub fn normalized(self) -> Result<Self, Error> {
        if self.controller.trim().is_empty() {
            return Err(Error::Validation("controller is required".into()));
        }
        let action = normalize_key(self.action.as_deref());
        let property = normalize_key(self.property.as_deref());
        check_key_len("controller", Some(&self.controller))?;
        check_key_len("action", action.as_deref())?;
        check_key_len("property", property.as_deref())?;

        Ok(Self {
            action,
            property,
            help_text: normalize_text(self.help_text),
            tooltip: normalize_text(self.tooltip),
            controller: self.controller,
        })
    }

    pub fn into_record(self, context_help_id: i32) -> ContextHelp {
        ContextHelp {
            context_help_id,
            controller: self.controller,
            action: self.action,
            property: self.property,
            help_text: self.help_text,
            tooltip: self.tooltip,
        }
    }
}

impl ContextHelp {
    pub fn has_action(&self) -> bool {
        normalize_key(self.action.as_deref()).is_some()
    }

    pub fn has_property(&self) -> bool {
        normalize_key(self.property.as_deref()).is_some()
    }

    /// Sort key used by the editor listing: (controller, action, property), nulls first.
    pub fn listing_key(&self) -> (&str, Option<&str>, Option<&str>, i32) {
        (
            self.controller.as_str(),
            self.action.as_deref(),
            self.property.as_deref(),
            self.context_help_id,
        )
    }
}

impl From<ContextHelp> for NewContextHelp {
    fn from(ch: ContextHelp) -> Self {
        Self {
            controller: ch.controller,
            action: ch.action,
            property: ch.property,
            help_text: ch.help_text,
            tooltip: ch.tooltip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optionals_become_none() {
        let new = NewContextHelp::new("Course")
            .with_action("   ")
            .with_property("")
            .with_help_text(" ")
            .with_tooltip("Course title")
            .normalized()
            .unwrap();

        assert_eq!(new.action, None);
        assert_eq!(new.property, None);
        assert_eq!(new.help_text, None);
        assert_eq!(new.tooltip.as_deref(), Some("Course title"));
    }

    #[test]
    fn controller_is_required() {
        let err = NewContextHelp::new("  ").normalized().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn keys_are_bounded() {
        let long = "x".repeat(MAX_KEY_LEN + 1);
        let err = NewContextHelp::new("Course")
            .with_property(long)
            .normalized()
            .unwrap_err();
        assert!(matches!(err, Error::Validation(msg) if msg.starts_with("property")));

        let exact = "x".repeat(MAX_KEY_LEN);
        assert!(NewContextHelp::new(exact).normalized().is_ok());
    }

    #[test]
    fn long_blank_keys_are_absent_not_too_long() {
        let padding = " ".repeat(MAX_KEY_LEN + 20);
        let new = NewContextHelp::new("Course")
            .with_action(padding.clone())
            .with_property(padding)
            .normalized()
            .unwrap();
        assert_eq!(new.action, None);
        assert_eq!(new.property, None);
    }
}
