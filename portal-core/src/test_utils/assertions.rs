//! Assertions over portal results

use crate::error::{PortalError, PortalResult};
use std::fmt::Debug;

/// Assert a validation failure carrying exactly `message`
pub fn assert_validation<T: Debug>(result: PortalResult<T>, message: &str) {
    match result {
        Err(PortalError::Validation(m)) => assert_eq!(m, message),
        other => panic!("Expected Validation({:?}), got {:?}", message, other),
    }
}

/// Assert the operation was refused for lack of an admin session
pub fn assert_unauthorized<T: Debug>(result: PortalResult<T>) {
    match result {
        Err(PortalError::Unauthorized(_)) => {}
        other => panic!("Expected Unauthorized, got {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertions_pass() {
        assert_validation::<()>(Err(PortalError::Validation("bad".into())), "bad");
        assert_unauthorized::<()>(Err(PortalError::Unauthorized("no".into())));
    }

    #[test]
    #[should_panic(expected = "Expected Unauthorized")]
    fn test_assert_unauthorized_rejects_ok() {
        assert_unauthorized(Ok(1));
    }
}
