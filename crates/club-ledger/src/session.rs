//! Explicit caller identity for store operations

use std::fmt;

use crate::error::LedgerError;

/// Characters the realtime store does not allow in document keys
const FORBIDDEN_KEY_CHARS: [char; 6] = ['/', '.', '#', '$', '[', ']'];

/// The owner on whose behalf a store call runs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Session {
    owner_id: String,
}

impl Session {
    pub fn new(owner_id: impl Into<String>) -> Result<Self, LedgerError> {
        let owner_id = owner_id.into().trim().to_string();
        if owner_id.is_empty() {
            return Err(LedgerError::invalid("owner id must not be empty"));
        }
        if owner_id.contains(FORBIDDEN_KEY_CHARS) {
            return Err(LedgerError::invalid(format!(
                "owner id '{owner_id}' contains one of {}",
                FORBIDDEN_KEY_CHARS.iter().collect::<String>()
            )));
        }
        Ok(Self { owner_id })
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.owner_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_trims_owner_id() {
        let session = Session::new("  uid-42 ").unwrap();
        assert_eq!(session.owner_id(), "uid-42");
        assert_eq!(session.to_string(), "uid-42");
    }

    #[test]
    fn test_session_rejects_bad_ids() {
        assert!(matches!(Session::new("   "), Err(LedgerError::Invalid(_))));
        assert!(matches!(Session::new("a/b"), Err(LedgerError::Invalid(_))));
        assert!(matches!(Session::new("a.b"), Err(LedgerError::Invalid(_))));
    }
}
