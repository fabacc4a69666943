use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Time no longer available, please choose again: {0}")]
    SlotConflict(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    /// Whether the message is meant to be shown to the client as-is.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            BookingError::NotFound(_) | BookingError::InvalidInput(_) | BookingError::SlotConflict(_)
        )
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
