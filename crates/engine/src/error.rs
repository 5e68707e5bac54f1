use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Reference data error: {0}")]
    DataError(#[from] renoscope_reference::DataError),

    #[error("Unknown metro code: {0}")]
    UnknownMetro(String),

    #[error("Invalid user input: {0}")]
    InvalidInput(String),
}
