// src/auth.rs
//
// Shared-secret gate in front of mutating operations. Nothing more.

use crate::config::options::AdminOptions;
use crate::error::{Error, Result};

#[derive(Clone, Debug, Default)]
pub struct AdminGate {
    secret: Option<String>,
}

impl AdminGate {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret: secret.filter(|s| !s.is_empty()) }
    }

    pub fn from_options(opts: &AdminOptions) -> Self {
        Self::new(opts.secret.clone())
    }

    /// An unset secret locks the gate.
    pub fn is_configured(&self) -> bool { self.secret.is_some() }

    pub fn check(&self, attempt: &str) -> bool {
        match &self.secret {
            Some(secret) => constant_time_eq(secret.as_bytes(), attempt.as_bytes()),
            None => false,
        }
    }

    pub fn authorize(&self, attempt: Option<&str>) -> Result<()> {
        if !self.is_configured() {
            return Err(Error::Unauthorized(s!("no admin secret configured")));
        }
        match attempt {
            Some(a) if self.check(a) => Ok(()),
            Some(_) => Err(Error::Unauthorized(s!("incorrect secret"))),
            None => Err(Error::Unauthorized(s!("secret required"))),
        }
    }
}

// Length is not hidden; content comparison does not short-circuit.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_secret_locks_everything() {
        let gate = AdminGate::new(Some(s!()));
        assert!(!gate.is_configured());
        assert!(!gate.check(""));
        assert!(gate.authorize(Some("")).is_err());
    }

    #[test]
    fn matches_exact_secret_only() {
        let gate = AdminGate::new(Some(s!("1234567890")));
        assert!(gate.check("1234567890"));
        assert!(!gate.check("123456789"));
        assert!(!gate.check("1234567891"));
        assert!(gate.authorize(Some("1234567890")).is_ok());
        assert!(matches!(gate.authorize(None), Err(Error::Unauthorized(_))));
    }
}
