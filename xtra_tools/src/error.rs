use thiserror::Error;

#[derive(Debug, Error)]
pub enum XtraApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid gateway response: {0}")]
    ResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Gateway query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Gateway declined the request: {0}")]
    Declined(String),
}
