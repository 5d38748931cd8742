//! Batch job submission contract.
//!
//! A submission is either validated only (dry run) or handed to a backend
//! that returns a job handle. The backend itself lives outside this crate
//! behind [`JobSubmitter`].

pub mod errors;
pub mod handler;
pub mod types;

pub use errors::JobError;
pub use handler::{JobSubmitter, MAX_BODY_BYTES, handle_submit};
pub use types::{
    DeadLetterQueue, FileSource, ItemList, JobHandle, JobSource, JobSubmission, SubmitRequest,
    SubmitResponse,
};
