use serde::{Deserialize, Serialize};

/// Who is acting, and on behalf of which organization and center.
///
/// Passed explicitly into workflows and provider calls instead of being read
/// from a global session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub organization_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_id: Option<String>,
    pub user_id: String,
}

impl SessionContext {
    /// Creates a context scoped to an organization, without a center.
    pub fn new(organization_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            center_id: None,
            user_id: user_id.into(),
        }
    }

    /// Narrows the context to a specific center of the organization.
    #[must_use]
    pub fn with_center(mut self, center_id: impl Into<String>) -> Self {
        self.center_id = Some(center_id.into());
        self
    }
}
