use serde::{Deserialize, Serialize};

/// Whoever is asking: a page viewer or someone editing help content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: Option<String>,
    pub roles: Vec<String>,
}

impl Actor {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_roles<I, S>(name: &str, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: Some(name.to_string()),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_in_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }
}
