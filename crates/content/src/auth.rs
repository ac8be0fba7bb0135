/// Single shared-secret admin check.
///
/// The session itself is a flag held in memory by whoever asked; nothing here
/// survives a reload.
#[derive(Debug, Clone, Default)]
pub struct AdminGate {
    secret: Option<String>,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        Self {
            secret: (!secret.is_empty()).then_some(secret),
        }
    }

    /// A gate without a secret rejects every attempt.
    pub fn locked() -> Self {
        Self { secret: None }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    pub fn check(&self, password: &str) -> bool {
        match &self.secret {
            Some(secret) => secret == password,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_the_secret() {
        let gate = AdminGate::new("letmein");
        assert!(gate.is_configured());
        assert!(gate.check("letmein"));
        assert!(!gate.check("letmein "));
        assert!(!gate.check(""));
    }

    #[test]
    fn empty_or_locked_gate_rejects_everything() {
        assert!(!AdminGate::new("").check(""));
        assert!(!AdminGate::locked().is_configured());
        assert!(!AdminGate::default().check("anything"));
    }
}
