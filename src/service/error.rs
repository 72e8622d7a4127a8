use crate::store::StoreError;

/// Failure taxonomy of the HR engine.
#[derive(Debug, thiserror::Error)]
pub enum HrError {
    /// User-correctable problems. Always the complete list, in check order.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },
    /// A storage constraint rejected the write; the caller may reload and
    /// retry.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

pub type HrResult<T> = Result<T, HrError>;

impl HrError {
    pub fn invalid(message: impl Into<String>) -> Self {
        HrError::Validation(vec![message.into()])
    }

    pub fn not_found(entity: &'static str, id: u64) -> Self {
        HrError::NotFound { entity, id }
    }

    pub fn violations(&self) -> &[String] {
        match self {
            HrError::Validation(v) => v,
            _ => &[],
        }
    }
}

impl From<StoreError> for HrError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => HrError::Conflict(msg),
            other => HrError::Storage(other.to_string()),
        }
    }
}

/// Turns accumulated messages into `Ok(())` or one validation error.
pub fn ensure_valid(errors: Vec<String>) -> HrResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(HrError::Validation(errors))
    }
}
