use crate::errors::{ConfigResult, ErrorKind};
use crate::reader::fields::{
    Int32Validation, Int64PtrValidation, Int64Validation, IntBounds, ListValidation,
    MapValidation, StringListValidation, StringValidation,
};
use crate::reader::yaml::{describe, read_json_bytes};
use crate::reader::{
    StructReader, StructValidation, check_all_or_none, check_specify_only_one,
};
use serde::Serialize;
use serde_yaml::{Mapping, Value};

pub const ITEM_LIST_KEY: &str = "item_list";
pub const FILE_PATH_LISTER_KEY: &str = "file_path_lister";
pub const DELIMITED_FILES_KEY: &str = "delimited_files";
const SOURCE_KEYS: [&str; 3] = [ITEM_LIST_KEY, FILE_PATH_LISTER_KEY, DELIMITED_FILES_KEY];

const DLQ_KEY: &str = "sqs_dead_letter_queue";
const DLQ_KEYS: [&str; 2] = ["arn", "max_receive_count"];

fn positive() -> IntBounds {
    IntBounds {
        greater_than: Some(0),
        ..Default::default()
    }
}

fn batch_size_validation() -> Int64Validation {
    Int64Validation {
        required: true,
        bounds: positive(),
        ..Default::default()
    }
}

/// Items passed inline in the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemList {
    pub items: Vec<Value>,
    pub batch_size: i64,
}

impl ItemList {
    fn read(data: &Mapping) -> ConfigResult<ItemList> {
        let mut reader = StructReader::new(data, &StructValidation::default());
        let items = reader.field(
            "items",
            &ListValidation {
                required: true,
                allow_empty: false,
            },
        );
        let batch_size = reader.field("batch_size", &batch_size_validation());
        reader.finish_first()?;
        Ok(ItemList { items, batch_size })
    }
}

/// Files in object storage, selected by glob patterns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSource {
    pub s3_paths: Vec<String>,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub batch_size: i64,
}

impl FileSource {
    fn read(data: &Mapping) -> ConfigResult<FileSource> {
        let mut reader = StructReader::new(data, &StructValidation::default());
        let s3_paths = reader.field(
            "s3_paths",
            &StringListValidation {
                required: true,
                allow_empty: false,
            },
        );
        let includes = reader.field("includes", &StringListValidation::default());
        let excludes = reader.field("excludes", &StringListValidation::default());
        let batch_size = reader.field("batch_size", &batch_size_validation());
        reader.finish_first()?;
        Ok(FileSource {
            s3_paths,
            includes,
            excludes,
            batch_size,
        })
    }
}

/// Where a job's work items come from. Exactly one is given per submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSource {
    ItemList(ItemList),
    FilePathLister(FileSource),
    DelimitedFiles(FileSource),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadLetterQueue {
    pub arn: String,
    pub max_receive_count: i64,
}

impl DeadLetterQueue {
    /// An empty map means no queue.
    fn read(data: &Mapping) -> ConfigResult<Option<DeadLetterQueue>> {
        check_all_or_none(data, &DLQ_KEYS)?;
        if data.is_empty() {
            return Ok(None);
        }

        let mut reader = StructReader::new(data, &StructValidation::default());
        let arn = reader.field(
            "arn",
            &StringValidation {
                required: true,
                ..Default::default()
            },
        );
        let max_receive_count = reader.field(
            "max_receive_count",
            &Int64Validation {
                required: true,
                bounds: positive(),
                ..Default::default()
            },
        );
        reader.finish_first()?;
        Ok(Some(DeadLetterQueue {
            arn,
            max_receive_count,
        }))
    }
}

/// A parsed batch job request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSubmission {
    pub source: JobSource,
    pub workers: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqs_dead_letter_queue: Option<DeadLetterQueue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Mapping>,
}

impl JobSubmission {
    /// Parse and validate a JSON request body.
    pub fn parse(body: &[u8]) -> ConfigResult<JobSubmission> {
        let value = read_json_bytes(body)?;
        let data = match &value {
            Value::Mapping(map) => map,
            other => {
                return Err(ErrorKind::InvalidPrimitiveType {
                    got: describe(other),
                    expected: "map".to_string(),
                }
                .into());
            }
        };
        Self::read(data)
    }

    pub fn read(data: &Mapping) -> ConfigResult<JobSubmission> {
        check_specify_only_one(data, &SOURCE_KEYS)?;

        let mut reader = StructReader::new(data, &StructValidation::default());
        let item_list = reader.field(ITEM_LIST_KEY, &MapValidation::default());
        let file_path_lister = reader.field(FILE_PATH_LISTER_KEY, &MapValidation::default());
        let delimited_files = reader.field(DELIMITED_FILES_KEY, &MapValidation::default());
        let workers = reader.field(
            "workers",
            &Int32Validation {
                default: 1,
                bounds: positive(),
                ..Default::default()
            },
        );
        let timeout = reader.field("timeout", &Int64PtrValidation { bounds: positive() });
        let dead_letter = reader.field(DLQ_KEY, &MapValidation::default());
        let config = reader.field("config", &MapValidation::default());
        reader.finish_first()?;

        let source = match (item_list, file_path_lister, delimited_files) {
            (Some(map), _, _) => {
                JobSource::ItemList(ItemList::read(&map).map_err(|e| e.wrap(ITEM_LIST_KEY))?)
            }
            (_, Some(map), _) => JobSource::FilePathLister(
                FileSource::read(&map).map_err(|e| e.wrap(FILE_PATH_LISTER_KEY))?,
            ),
            (_, _, Some(map)) => JobSource::DelimitedFiles(
                FileSource::read(&map).map_err(|e| e.wrap(DELIMITED_FILES_KEY))?,
            ),
            (None, None, None) => {
                return Err(ErrorKind::SpecifyOnlyOneMissing {
                    keys: SOURCE_KEYS.iter().map(|k| k.to_string()).collect(),
                }
                .into());
            }
        };

        let sqs_dead_letter_queue = match dead_letter {
            Some(map) => DeadLetterQueue::read(&map).map_err(|e| e.wrap(DLQ_KEY))?,
            None => None,
        };

        Ok(JobSubmission {
            source,
            workers,
            timeout,
            sqs_dead_letter_queue,
            config,
        })
    }
}

/// A submission as received, before parsing.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub api_name: String,
    /// Validate only; nothing is enqueued.
    pub dry_run: bool,
    pub body: Vec<u8>,
}

/// A job accepted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobHandle {
    pub job_id: String,
    pub api_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResponse {
    /// Text describing what a real submission would do.
    DryRun(String),
    Submitted(JobHandle),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ConfigResult<JobSubmission> {
        JobSubmission::parse(json.as_bytes())
    }

    #[test]
    fn test_item_list_with_defaults() {
        let submission = parse(r#"{"item_list": {"items": [1, 2, 3], "batch_size": 2}}"#).unwrap();
        assert_eq!(submission.workers, 1);
        assert_eq!(submission.timeout, None);
        assert_eq!(submission.sqs_dead_letter_queue, None);
        match submission.source {
            JobSource::ItemList(list) => {
                assert_eq!(list.items.len(), 3);
                assert_eq!(list.batch_size, 2);
            }
            other => panic!("unexpected source {:?}", other),
        }
    }

    #[test]
    fn test_file_sources() {
        let submission = parse(
            r#"{"delimited_files": {"s3_paths": ["s3://bucket/data"], "includes": ["*.json"], "batch_size": 10},
                "workers": 4, "timeout": 600, "config": {"threshold": 0.5}}"#,
        )
        .unwrap();
        assert_eq!(submission.workers, 4);
        assert_eq!(submission.timeout, Some(600));
        assert!(submission.config.is_some());
        assert!(matches!(
            submission.source,
            JobSource::DelimitedFiles(FileSource { ref includes, .. }) if includes == &["*.json"]
        ));
    }

    #[test]
    fn test_exactly_one_source() {
        let err = parse(r#"{"workers": 2}"#).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::SpecifyOnlyOneMissing { .. }));

        let err = parse(
            r#"{"item_list": {"items": [1], "batch_size": 1},
                "file_path_lister": {"s3_paths": ["s3://b"], "batch_size": 1}}"#,
        )
        .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::SpecifyOnlyOne { .. }));
    }

    #[test]
    fn test_workers_and_timeout_bounds() {
        let err = parse(r#"{"item_list": {"items": [1], "batch_size": 1}, "workers": 0}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "workers: must be greater than 0 (got 0)");

        let err = parse(r#"{"item_list": {"items": [1], "batch_size": 1}, "timeout": -5}"#)
            .unwrap_err();
        assert_eq!(err.context(), &["timeout"]);
    }

    #[test]
    fn test_nested_errors_are_located() {
        let err = parse(r#"{"item_list": {"items": [], "batch_size": 1}}"#).unwrap_err();
        assert_eq!(err.to_string(), "item_list: items: cannot be empty");
    }

    #[test]
    fn test_dead_letter_queue_all_or_none() {
        let err = parse(
            r#"{"item_list": {"items": [1], "batch_size": 1},
                "sqs_dead_letter_queue": {"arn": "arn:aws:sqs:us-west-2:123:dlq"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::SpecifyAllOrNone { .. }));
        assert_eq!(err.context(), &["sqs_dead_letter_queue"]);

        let submission = parse(
            r#"{"item_list": {"items": [1], "batch_size": 1},
                "sqs_dead_letter_queue": {"arn": "arn:aws:sqs:us-west-2:123:dlq", "max_receive_count": 3}}"#,
        )
        .unwrap();
        assert_eq!(
            submission.sqs_dead_letter_queue,
            Some(DeadLetterQueue {
                arn: "arn:aws:sqs:us-west-2:123:dlq".to_string(),
                max_receive_count: 3
            })
        );

        let submission = parse(
            r#"{"item_list": {"items": [1], "batch_size": 1}, "sqs_dead_letter_queue": {}}"#,
        )
        .unwrap();
        assert_eq!(submission.sqs_dead_letter_queue, None);
    }

    #[test]
    fn test_invalid_body() {
        let err = parse("[1, 2]").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidPrimitiveType { .. }));

        let err = parse("{not json").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ParseConfig { .. }));

        let err = parse(r#"{"item_list": {"items": [1], "batch_size": 1}, "retries": 3}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "retries: key is not supported");
    }
}
