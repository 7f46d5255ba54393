//! The "acting as" identity.
//!
//! Loaded once at startup. The selected user id is passed to the policy list
//! as `userId` so the backend returns that user's view of the policies.

use tracing::{error, info};

use crate::api::PolicyApi;
use crate::model::User;

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

pub const USERS_ERROR: &str = "Failed to load users.";

#[derive(Debug, Clone, Default)]
pub struct UserContext {
    users: Vec<User>,
    selected_user_id: Option<String>,
    user_error: Option<String>,
}

impl UserContext {
    /// Builds a context from an already fetched user list.
    pub fn from_users(users: Vec<User>, admin_email: &str) -> Self {
        let selected_user_id = users
            .iter()
            .find(|u| u.email == admin_email)
            .map(|u| u.id.clone());
        Self {
            users,
            selected_user_id,
            user_error: None,
        }
    }

    /// Fetches users and selects the one whose email is `admin_email`.
    ///
    /// A failed fetch yields an empty context with [`USERS_ERROR`] set.
    pub async fn load(api: &dyn PolicyApi, admin_email: &str) -> Self {
        match api.list_users().await {
            Ok(users) => {
                let ctx = Self::from_users(users, admin_email);
                info!(
                    users = ctx.users.len(),
                    acting_as = ?ctx.selected_user_id,
                    "user context loaded"
                );
                ctx
            }
            Err(e) => {
                error!(error = %e, "Error fetching users for context");
                Self {
                    users: Vec::new(),
                    selected_user_id: None,
                    user_error: Some(USERS_ERROR.to_string()),
                }
            }
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn selected_user_id(&self) -> Option<&str> {
        self.selected_user_id.as_deref()
    }

    pub fn selected_user(&self) -> Option<&User> {
        let id = self.selected_user_id.as_deref()?;
        self.users.iter().find(|u| u.id == id)
    }

    pub fn set_selected_user_id(&mut self, user_id: Option<String>) {
        self.selected_user_id = user_id;
    }

    /// Selects a user by id or email. Returns `false` when nobody matches.
    pub fn select(&mut self, id_or_email: &str) -> bool {
        match self
            .users
            .iter()
            .find(|u| u.id == id_or_email || u.email.eq_ignore_ascii_case(id_or_email))
        {
            Some(user) => {
                self.selected_user_id = Some(user.id.clone());
                true
            }
            None => false,
        }
    }

    pub fn user_error(&self) -> Option<&str> {
        self.user_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.into(),
            email: email.into(),
            ..User::default()
        }
    }

    #[test]
    fn test_admin_selected_by_email() {
        let ctx = UserContext::from_users(
            vec![user("u1", "bob@example.com"), user("u2", DEFAULT_ADMIN_EMAIL)],
            DEFAULT_ADMIN_EMAIL,
        );
        assert_eq!(ctx.selected_user_id(), Some("u2"));
        assert_eq!(ctx.selected_user().map(|u| u.email.as_str()), Some(DEFAULT_ADMIN_EMAIL));
    }

    #[test]
    fn test_no_admin_means_no_selection() {
        let ctx = UserContext::from_users(vec![user("u1", "bob@example.com")], DEFAULT_ADMIN_EMAIL);
        assert_eq!(ctx.selected_user_id(), None);
    }

    #[test]
    fn test_select_by_id_or_email() {
        let mut ctx = UserContext::from_users(
            vec![user("u1", "bob@example.com"), user("u2", "eve@example.com")],
            DEFAULT_ADMIN_EMAIL,
        );
        assert!(ctx.select("EVE@example.com"));
        assert_eq!(ctx.selected_user_id(), Some("u2"));
        assert!(ctx.select("u1"));
        assert_eq!(ctx.selected_user_id(), Some("u1"));
        assert!(!ctx.select("nobody"));
        assert_eq!(ctx.selected_user_id(), Some("u1"));
        ctx.set_selected_user_id(None);
        assert_eq!(ctx.selected_user(), None);
    }
}
