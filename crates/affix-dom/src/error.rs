use thiserror::Error;

use crate::ElementId;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("node {0} does not exist in this document")]
    NodeNotFound(ElementId),

    #[error("node {0} is not an element")]
    NotAnElement(ElementId),

    #[error("cannot move the document root")]
    CannotMoveRoot,
}

pub type DomResult<T> = Result<T, DomError>;
