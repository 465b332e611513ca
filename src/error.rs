use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChurnError>;

#[derive(Error, Debug)]
pub enum ChurnError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("GitHub API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("Invalid repository: {0}")]
    InvalidRepo(String),
}
