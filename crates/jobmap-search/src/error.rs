use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("job data is not loaded")]
    NotReady,

    #[error("no cluster with id {0}")]
    UnknownCluster(u32),
}
