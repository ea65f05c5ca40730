use std::sync::{Arc, RwLock};

/// Bearer credential shared by every request-issuing collaborator.
///
/// Set at login, read by each authenticated request, cleared at logout.
/// Clones share the same underlying slot.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Option<String>) -> Self {
        let session = Self::new();
        if let Some(token) = credential.filter(|t| !t.trim().is_empty()) {
            session.login(token);
        }
        session
    }

    pub fn login(&self, token: impl Into<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.into());
        }
    }

    pub fn logout(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
    }

    pub fn bearer(&self) -> Option<String> {
        self.token.read().ok().and_then(|slot| slot.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let session = Session::new();
        assert!(!session.is_authenticated());

        let shared = session.clone();
        session.login("secret");
        assert_eq!(shared.bearer().as_deref(), Some("secret"));

        shared.logout();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_blank_credential_is_ignored() {
        assert!(!Session::with_credential(Some("  ".to_string())).is_authenticated());
        assert!(!Session::with_credential(None).is_authenticated());
        assert!(Session::with_credential(Some("k".to_string())).is_authenticated());
    }
}
