/// Errors a user can cause by picking flags or a listing that don't fit.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FeedError {
    #[error("{0}")]
    UsageConflict(String),
    #[error("{message}")]
    IndexOutOfRange { message: String },
    #[error("I'm sorry but the subreddit '{0}' does not exist; try again.")]
    UnknownSource(String),
    #[error("There were no links to choose from in '{0}'. Perhaps the subreddit you chose is too small.")]
    EmptyListing(String),
}

impl FeedError {
    pub fn out_of_range(message: impl Into<String>) -> Self {
        FeedError::IndexOutOfRange {
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("'{0}' is not a valid range. Expected forms like '1..5'")]
    InvalidFormat(String),
    #[error("Range values are not valid integers. Expected forms like '1..5'")]
    InvalidValue,
}
