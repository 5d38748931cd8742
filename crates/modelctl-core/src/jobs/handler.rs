use crate::jobs::errors::JobError;
use crate::jobs::types::{JobHandle, JobSubmission, SubmitRequest, SubmitResponse};
use tracing::{info, warn};

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 64 << 20;

/// A backend able to run batch jobs for a deployed API.
pub trait JobSubmitter {
    /// Describe what submitting would do, without enqueuing anything.
    fn dry_run(&self, api_name: &str, submission: &JobSubmission) -> Result<String, JobError>;

    fn submit(&self, api_name: &str, submission: &JobSubmission) -> Result<JobHandle, JobError>;
}

/// Validate a request and run it in exactly one mode, chosen by `dry_run`.
pub fn handle_submit<S: JobSubmitter + ?Sized>(
    submitter: &S,
    request: &SubmitRequest,
) -> Result<SubmitResponse, JobError> {
    info!(
        event = "core.jobs.submit_started",
        api_name = %request.api_name,
        dry_run = request.dry_run
    );

    if request.body.len() > MAX_BODY_BYTES {
        warn!(
            event = "core.jobs.submit_rejected",
            api_name = %request.api_name,
            size = request.body.len()
        );
        return Err(JobError::BodyTooLarge {
            size: request.body.len(),
            max: MAX_BODY_BYTES,
        });
    }

    let submission = JobSubmission::parse(&request.body)?;

    if request.dry_run {
        let report = submitter.dry_run(&request.api_name, &submission)?;
        info!(event = "core.jobs.dry_run_completed", api_name = %request.api_name);
        return Ok(SubmitResponse::DryRun(report));
    }

    let handle = submitter.submit(&request.api_name, &submission)?;
    info!(
        event = "core.jobs.submit_completed",
        api_name = %request.api_name,
        job_id = %handle.job_id
    );
    Ok(SubmitResponse::Submitted(handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<&'static str>>,
    }

    impl JobSubmitter for Recorder {
        fn dry_run(&self, api_name: &str, submission: &JobSubmission) -> Result<String, JobError> {
            self.calls.borrow_mut().push("dry_run");
            Ok(format!("{}: {} workers", api_name, submission.workers))
        }

        fn submit(&self, api_name: &str, _submission: &JobSubmission) -> Result<JobHandle, JobError> {
            self.calls.borrow_mut().push("submit");
            Ok(JobHandle {
                job_id: "job-1".to_string(),
                api_name: api_name.to_string(),
            })
        }
    }

    fn request(dry_run: bool, body: &str) -> SubmitRequest {
        SubmitRequest {
            api_name: "iris".to_string(),
            dry_run,
            body: body.as_bytes().to_vec(),
        }
    }

    const BODY: &str = r#"{"item_list": {"items": [1, 2], "batch_size": 1}, "workers": 2}"#;

    #[test]
    fn test_dry_run_does_not_submit() {
        let recorder = Recorder::default();
        let response = handle_submit(&recorder, &request(true, BODY)).unwrap();
        assert_eq!(response, SubmitResponse::DryRun("iris: 2 workers".to_string()));
        assert_eq!(*recorder.calls.borrow(), vec!["dry_run"]);
    }

    #[test]
    fn test_submit_returns_handle() {
        let recorder = Recorder::default();
        let response = handle_submit(&recorder, &request(false, BODY)).unwrap();
        assert_eq!(
            response,
            SubmitResponse::Submitted(JobHandle {
                job_id: "job-1".to_string(),
                api_name: "iris".to_string()
            })
        );
        assert_eq!(*recorder.calls.borrow(), vec!["submit"]);
    }

    #[test]
    fn test_invalid_body_reaches_no_backend() {
        let recorder = Recorder::default();
        let err = handle_submit(&recorder, &request(false, r#"{"workers": 1}"#)).unwrap_err();
        match err {
            JobError::InvalidSubmission { source } => {
                assert!(matches!(source.kind(), ErrorKind::SpecifyOnlyOneMissing { .. }))
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(recorder.calls.borrow().is_empty());
    }

    #[test]
    fn test_oversized_body() {
        let recorder = Recorder::default();
        let mut req = request(true, "");
        req.body = vec![b' '; MAX_BODY_BYTES + 1];
        let err = handle_submit(&recorder, &req).unwrap_err();
        assert!(matches!(err, JobError::BodyTooLarge { .. }));
    }
}
