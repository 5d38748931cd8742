//! One-line summaries of many resource statuses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Width of the label column in summary rows.
const LABEL_WIDTH: usize = 23;

/// Anything that reports a status for display.
pub trait Status {
    /// Lower buckets are listed first.
    fn sort_bucket(&self) -> i32;

    fn message(&self) -> String;
}

/// Summarize statuses as `"<count> <message>"` entries joined by `" | "`.
///
/// Entries are grouped by bucket in ascending order, and sorted by message
/// within a bucket. An empty input renders as `"none"`.
pub fn status_str<S: Status + ?Sized>(statuses: &[&S]) -> String {
    if statuses.is_empty() {
        return "none".to_string();
    }

    let mut buckets: BTreeMap<i32, BTreeMap<String, usize>> = BTreeMap::new();
    for status in statuses {
        *buckets
            .entry(status.sort_bucket())
            .or_default()
            .entry(status.message())
            .or_default() += 1;
    }

    buckets
        .values()
        .flat_map(|counts| {
            counts
                .iter()
                .map(|(message, count)| format!("{} {}", count, message))
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Replica state of a served API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    #[default]
    Unknown,
    Pending,
    Updating,
    Stopping,
    Error,
    OutOfMemory,
    Ready,
    Stopped,
}

impl StatusCode {
    /// Failures first, then unknown, then transitions, then steady states.
    pub fn sort_bucket(&self) -> i32 {
        match self {
            StatusCode::Error | StatusCode::OutOfMemory => 0,
            StatusCode::Unknown => 1,
            StatusCode::Pending | StatusCode::Updating | StatusCode::Stopping => 2,
            StatusCode::Ready => 3,
            StatusCode::Stopped => 4,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            StatusCode::Unknown => "unknown",
            StatusCode::Pending => "pending",
            StatusCode::Updating => "updating",
            StatusCode::Stopping => "stopping",
            StatusCode::Error => "error",
            StatusCode::OutOfMemory => "error (out of memory)",
            StatusCode::Ready => "ready",
            StatusCode::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Status of one API as reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    pub api_name: String,
    pub code: StatusCode,
}

impl Status for ApiStatus {
    fn sort_bucket(&self) -> i32 {
        self.code.sort_bucket()
    }

    fn message(&self) -> String {
        self.code.message().to_string()
    }
}

/// The `APIs:` row of a status report.
pub fn apis_status_line(statuses: &[ApiStatus]) -> String {
    let refs: Vec<&ApiStatus> = statuses.iter().collect();
    format!("{:<width$}{}", "APIs:", status_str(&refs), width = LABEL_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(name: &str, code: StatusCode) -> ApiStatus {
        ApiStatus {
            api_name: name.to_string(),
            code,
        }
    }

    struct Custom(i32, &'static str);

    impl Status for Custom {
        fn sort_bucket(&self) -> i32 {
            self.0
        }

        fn message(&self) -> String {
            self.1.to_string()
        }
    }

    #[test]
    fn test_status_str_empty() {
        let empty: [&ApiStatus; 0] = [];
        assert_eq!(status_str(&empty), "none");
    }

    #[test]
    fn test_status_str_groups_pending_first() {
        let statuses = [
            api("a", StatusCode::Ready),
            api("b", StatusCode::Ready),
            api("c", StatusCode::Pending),
        ];
        let refs: Vec<&ApiStatus> = statuses.iter().collect();
        assert_eq!(status_str(&refs), "1 pending | 2 ready");
    }

    #[test]
    fn test_status_str_sorts_within_bucket() {
        let statuses = [
            Custom(5, "zeta"),
            Custom(5, "alpha"),
            Custom(5, "zeta"),
            Custom(-1, "first"),
        ];
        let refs: Vec<&Custom> = statuses.iter().collect();
        assert_eq!(status_str(&refs), "1 first | 1 alpha | 2 zeta");
    }

    #[test]
    fn test_status_str_heterogeneous() {
        let ready = api("a", StatusCode::Ready);
        let custom = Custom(0, "failed");
        let statuses: [&dyn Status; 2] = [&ready, &custom];
        assert_eq!(status_str(&statuses), "1 failed | 1 ready");
    }

    #[test]
    fn test_failures_sort_before_steady_states() {
        assert!(StatusCode::Error.sort_bucket() < StatusCode::Pending.sort_bucket());
        assert!(StatusCode::OutOfMemory.sort_bucket() < StatusCode::Ready.sort_bucket());
        assert!(StatusCode::Ready.sort_bucket() < StatusCode::Stopped.sort_bucket());
    }

    #[test]
    fn test_apis_status_line() {
        assert_eq!(apis_status_line(&[]), format!("APIs:{}none", " ".repeat(18)));
        let line = apis_status_line(&[api("a", StatusCode::OutOfMemory), api("b", StatusCode::Ready)]);
        assert!(line.ends_with("1 error (out of memory) | 1 ready"));
    }
}
