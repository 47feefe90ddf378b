//! # Framework Errors
//!
//! Errors raised by the actor plumbing itself. Record-level failures travel inside
//! [`FrameworkError::EntityError`] and can be recovered with [`FrameworkError::entity_error`].

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Borrow the record-level error as `E`, if that is what this error carries.
    pub fn entity_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            FrameworkError::EntityError(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("out of range: {0}")]
    struct RangeError(u32);

    #[test]
    fn entity_error_downcasts_to_the_original_type() {
        let err = FrameworkError::EntityError(Box::new(RangeError(7)));
        assert_eq!(err.entity_error::<RangeError>(), Some(&RangeError(7)));
        assert_eq!(err.to_string(), "out of range: 7");
    }

    #[test]
    fn plumbing_errors_carry_no_entity_error() {
        assert!(FrameworkError::ActorClosed
            .entity_error::<RangeError>()
            .is_none());
        assert_eq!(
            FrameworkError::NotFound("order_3".into()).to_string(),
            "Item not found: order_3"
        );
    }
}
