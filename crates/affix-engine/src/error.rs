use affix_behavior::BehaviorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),
}

pub type EngineResult<T> = Result<T, EngineError>;
