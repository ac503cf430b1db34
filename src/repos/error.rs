/**
 * Responsibility
 * - registry が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read service registry: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed service registry: {0}")]
    Json(#[from] serde_json::Error),
    #[error("registered service {id} has an invalid serviceId pattern")]
    InvalidPattern {
        id: i64,
        #[source]
        source: regex::Error,
    },
    #[error("duplicate registered service id {0}")]
    DuplicateId(i64),
}

pub type RepoResult<T> = Result<T, RegistryError>;
