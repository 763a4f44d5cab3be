/// Identity extracted from a verified bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub username: String,
    pub is_admin: bool,
}

impl UserContext {
    pub fn new(username: impl Into<String>, is_admin: bool) -> Self {
        Self {
            username: username.into(),
            is_admin,
        }
    }

    /// Admins may act on any user; everyone else only on themselves.
    pub fn can_act_for(&self, username: &str) -> bool {
        self.is_admin || self.username == username
    }
}
