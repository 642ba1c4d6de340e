use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmsError {
    #[error("CMS project is not configured")]
    NotConfigured,

    #[error("CMS request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CMS returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("CMS response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid query parameter '{name}': {message}")]
    Param { name: String, message: String },
}

pub type Result<T> = std::result::Result<T, CmsError>;
