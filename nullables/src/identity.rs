//! Nullable identity source: a caller that tests switch by hand.

use devreg_types::{CallerId, IdentityError, IdentitySource};
use std::sync::Mutex;

/// Reports whichever caller was set last; errors if none was set.
#[derive(Default)]
pub struct NullIdentity {
    caller: Mutex<Option<CallerId>>,
}

impl NullIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_caller(caller: impl Into<String>) -> Self {
        let identity = Self::new();
        identity.set_caller(caller);
        identity
    }

    /// Make subsequent calls appear to come from `caller`.
    pub fn set_caller(&self, caller: impl Into<String>) {
        *self.caller.lock().unwrap() = Some(CallerId::new(caller));
    }

    /// Make subsequent calls anonymous.
    pub fn clear(&self) {
        *self.caller.lock().unwrap() = None;
    }
}

impl IdentitySource for NullIdentity {
    fn current_caller_id(&self) -> Result<CallerId, IdentityError> {
        self.caller
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| IdentityError("no caller set".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_callers() {
        let id = NullIdentity::with_caller("voter-1");
        assert_eq!(id.current_caller_id().unwrap().as_str(), "voter-1");
        id.set_caller("voter-2");
        assert_eq!(id.current_caller_id().unwrap().as_str(), "voter-2");
        id.clear();
        assert!(id.current_caller_id().is_err());
    }
}
