use crate::errors::{ConfigError, ModelctlError};

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("invalid job submission: {source}")]
    InvalidSubmission {
        #[from]
        source: ConfigError,
    },

    #[error("request body is {size} bytes, larger than the {max} byte limit")]
    BodyTooLarge { size: usize, max: usize },

    #[error("job backend failed: {message}")]
    Backend { message: String },
}

impl ModelctlError for JobError {
    fn error_code(&self) -> &'static str {
        match self {
            JobError::InvalidSubmission { .. } => "INVALID_JOB_SUBMISSION",
            JobError::BodyTooLarge { .. } => "JOB_BODY_TOO_LARGE",
            JobError::Backend { .. } => "JOB_BACKEND_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            JobError::InvalidSubmission { .. } | JobError::BodyTooLarge { .. }
        )
    }
}
