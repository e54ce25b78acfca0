//! The process-wide set of accepted API keys.

use subtle::ConstantTimeEq;

/// Immutable set of accepted API-key strings, loaded once from config.
///
/// Membership tests are constant-time with respect to the active set size:
/// every candidate key is compared against every configured key, and the
/// comparison itself never short-circuits on a byte mismatch.
#[derive(Debug, Clone)]
pub struct AuthCredential {
    keys: Vec<String>,
}

impl AuthCredential {
    /// Build the credential set. An empty list is a configuration error the
    /// caller must reject before constructing this type.
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether `candidate` matches any configured key.
    ///
    /// Every configured key is checked even after a match is found, so the
    /// total work done is independent of which key (if any) matched.
    pub fn contains(&self, candidate: &str) -> bool {
        let candidate = candidate.as_bytes();
        let mut found = 0u8;
        for key in &self.keys {
            let key = key.as_bytes();
            if key.len() == candidate.len() {
                found |= key.ct_eq(candidate).unwrap_u8();
            }
        }
        found == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_configured_keys() {
        let creds = AuthCredential::new(vec!["key-a".to_string(), "key-b".to_string()]);
        assert!(creds.contains("key-a"));
        assert!(creds.contains("key-b"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let creds = AuthCredential::new(vec!["key-a".to_string()]);
        assert!(!creds.contains("key-c"));
        assert!(!creds.contains(""));
    }

    #[test]
    fn empty_set_accepts_nothing() {
        let creds = AuthCredential::new(vec![]);
        assert!(creds.is_empty());
        assert!(!creds.contains("anything"));
    }
}
