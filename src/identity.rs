use std::collections::HashMap;

use crate::error::MigrateError;
use crate::model::source::SourceUser;

/// Jira identity → GitHub login table, loaded once at startup and passed to the mapper.
#[derive(Debug, Clone, Default)]
pub struct IdentityMap {
    users: HashMap<String, String>,
}

impl IdentityMap {
    pub fn new(users: HashMap<String, String>) -> Self {
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn resolve(&self, user: &SourceUser) -> Result<&str, MigrateError> {
        user.identities()
            .find_map(|id| self.users.get(id))
            .map(String::as_str)
            .ok_or_else(|| MigrateError::UnmappedUser(user.display_name.clone()))
    }
}

impl FromIterator<(String, String)> for IdentityMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
