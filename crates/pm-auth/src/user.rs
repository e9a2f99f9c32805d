//! The authenticated caller

use pm_core::traits::UserId;

/// Identity of the property manager making a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Subject assigned by the identity provider; owns properties
    pub id: UserId,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl CurrentUser {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            email: None,
            name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}
