use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupplierApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid supplier response: {0}")]
    ResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Supplier query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}
