use affix_dom::{DomError, ElementId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("behavior name must be a non-empty string")]
    EmptyName,

    #[error("target {0} is not an element node")]
    InvalidTarget(ElementId),

    #[error("behavior has no method named {0:?}")]
    UnknownMethod(String),

    /// For user hooks that want to fail with a message of their own.
    #[error("lifecycle hook failed: {0}")]
    Hook(String),

    #[error(transparent)]
    Dom(#[from] DomError),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
