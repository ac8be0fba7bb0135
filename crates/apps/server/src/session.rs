use std::collections::HashSet;

use parking_lot::RwLock;
use uuid::Uuid;

/// Bearer tokens handed out after a successful admin sign-in. Memory only.
#[derive(Debug, Default)]
pub struct Sessions {
    tokens: RwLock<HashSet<Uuid>>,
}

impl Sessions {
    pub fn issue(&self) -> Uuid {
        let token = Uuid::new_v4();
        self.tokens.write().insert(token);
        token
    }

    pub fn revoke(&self, token: &Uuid) -> bool {
        self.tokens.write().remove(token)
    }

    pub fn is_valid(&self, token: &str) -> bool {
        Uuid::parse_str(token.trim())
            .map(|t| self.tokens.read().contains(&t))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_are_valid_until_revoked() {
        let sessions = Sessions::default();
        let token = sessions.issue();
        assert!(sessions.is_valid(&token.to_string()));
        assert!(sessions.revoke(&token));
        assert!(!sessions.is_valid(&token.to_string()));
        assert!(!sessions.revoke(&token));
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let sessions = Sessions::default();
        sessions.issue();
        assert!(!sessions.is_valid("not-a-uuid"));
        assert!(!sessions.is_valid(&Uuid::new_v4().to_string()));
    }
}
