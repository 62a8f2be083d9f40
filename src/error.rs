#[derive(Debug, thiserror::Error)]
pub enum CutError {
    #[error("piece width {width} does not fit parent roll width {parent}")]
    InvalidDemand { width: f64, parent: f64 },

    #[error("parent roll width must be a positive number, got {0}")]
    InvalidParent(f64),

    #[error("chunk size must be at least 1, got {0}")]
    InvalidChunkSize(usize),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Failure of one ILP solve. Never escapes the orchestrator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    #[error("model is infeasible")]
    Infeasible,

    #[error("model is unbounded")]
    Unbounded,

    #[error("solver failed: {0}")]
    Failed(String),

    #[error("time limit reached without a feasible assignment")]
    NoIncumbent,

    #[error("solve cancelled")]
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, CutError>;
