use crate::config::resource_type::{ResourceType, plurals};
use crate::strings::{strs_and, strs_or, user_str, user_strs_and, user_strs_or};
use std::error::Error;

/// Base trait for all application errors
pub trait ModelctlError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Result type for document loading and validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Every failure the document engine can report.
///
/// The kind is what callers branch on; the rendered text is for humans.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    #[error("unknown error")]
    Unknown,

    #[error("invalid resource type {}", user_str(.kind))]
    UnknownResourceKind { kind: String },

    #[error("{resource_type} {} not found", user_str(.name))]
    ResourceNotFound {
        name: String,
        resource_type: ResourceType,
    },

    #[error("resource {} not found", user_str(.name))]
    ResourceNameNotFound { name: String },

    #[error("{}", duplicate_resource_name_message(.name, .resource_types, .file_paths))]
    DuplicateResourceName {
        name: String,
        resource_types: Vec<String>,
        file_paths: Vec<String>,
    },

    #[error("{resource_type} resource may only be defined once")]
    DuplicateConfig { resource_type: ResourceType },

    #[error("YAML configuration files must contain a list of maps")]
    MalformedConfig,

    #[error("failed to parse config file: {message}")]
    ParseConfig { message: String },

    #[error("failed to read config file: {message}")]
    ReadConfig { message: String },

    #[error("{file_name} must define a {} resource", ResourceType::Deployment)]
    MissingDeploymentDefinition { file_name: String },

    #[error("{resource_type} resource is not defined")]
    UndefinedConfig { resource_type: ResourceType },

    #[error("{}", undefined_resource_message(.name, .resource_types))]
    UndefinedResource {
        name: String,
        resource_types: Vec<ResourceType>,
    },

    #[error("{}", resource_wrong_type_message(.name, .actual, .valid))]
    ResourceWrongType {
        name: String,
        actual: Vec<ResourceType>,
        valid: Vec<ResourceType>,
    },

    #[error("{}", specify_all_or_none_message(.keys))]
    SpecifyAllOrNone { keys: Vec<String> },

    #[error("{}", specify_only_one_message(.keys))]
    SpecifyOnlyOne { keys: Vec<String> },

    #[error("{}", specify_only_one_missing_message(.keys))]
    SpecifyOnlyOneMissing { keys: Vec<String> },

    #[error(
        "{} specified without specifying {}",
        user_str(.key),
        user_strs_or(.prerequisites)
    )]
    OneOfPrerequisitesNotDefined {
        key: String,
        prerequisites: Vec<String>,
    },

    #[error("cannot be null")]
    CannotBeNull,

    #[error(
        "resource compute quantity must be an integer-valued string, e.g. \"2\" (got {})",
        user_str(.quantity)
    )]
    QuantityMustBeInt { quantity: String },

    #[error("please specify {}", user_strs_or(.options))]
    BeMoreSpecific { options: Vec<String> },

    #[error("must be defined")]
    MustBeDefined,

    #[error("cannot be empty")]
    CannotBeEmpty,

    #[error("invalid type (got {got}, expected {expected})")]
    InvalidPrimitiveType { got: String, expected: String },

    #[error(
        "{} must contain only lower case letters, numbers, and dashes, start with a letter, and cannot end with a dash",
        user_str(.value)
    )]
    InvalidDns1035 { value: String },

    #[error(
        "{} must contain only lower case letters, numbers, and dashes, and must start and end with an alphanumeric character",
        user_str(.value)
    )]
    InvalidDns1123 { value: String },

    #[error(
        "{} must contain only letters, numbers, underscores, and dashes",
        user_str(.value)
    )]
    InvalidAlphaNumericDashUnderscore { value: String },

    #[error("must be no more than {max_len} characters (got {len})")]
    TooLong { max_len: usize, len: usize },

    #[error("must be greater than {bound} (got {got})")]
    MustBeGreaterThan { bound: String, got: String },

    #[error("must be greater than or equal to {bound} (got {got})")]
    MustBeGreaterThanOrEqualTo { bound: String, got: String },

    #[error("key is not supported")]
    UnsupportedKey,

    #[error(
        "invalid provider {} (valid providers are {})",
        user_str(.name),
        user_strs_and(.valid)
    )]
    InvalidProviderType { name: String, valid: Vec<String> },

    #[error("{} is not a valid resource quantity (e.g. \"500m\", \"2\", \"1Gi\")", user_str(.quantity))]
    InvalidQuantity { quantity: String },
}

impl ErrorKind {
    /// Stable code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Unknown => "UNKNOWN",
            ErrorKind::UnknownResourceKind { .. } => "UNKNOWN_RESOURCE_KIND",
            ErrorKind::ResourceNotFound { .. } => "RESOURCE_NOT_FOUND",
            ErrorKind::ResourceNameNotFound { .. } => "RESOURCE_NAME_NOT_FOUND",
            ErrorKind::DuplicateResourceName { .. } => "DUPLICATE_RESOURCE_NAME",
            ErrorKind::DuplicateConfig { .. } => "DUPLICATE_CONFIG",
            ErrorKind::MalformedConfig => "MALFORMED_CONFIG",
            ErrorKind::ParseConfig { .. } => "PARSE_CONFIG",
            ErrorKind::ReadConfig { .. } => "READ_CONFIG",
            ErrorKind::MissingDeploymentDefinition { .. } => "MISSING_DEPLOYMENT_DEFINITION",
            ErrorKind::UndefinedConfig { .. } => "UNDEFINED_CONFIG",
            ErrorKind::UndefinedResource { .. } => "UNDEFINED_RESOURCE",
            ErrorKind::ResourceWrongType { .. } => "RESOURCE_WRONG_TYPE",
            ErrorKind::SpecifyAllOrNone { .. } => "SPECIFY_ALL_OR_NONE",
            ErrorKind::SpecifyOnlyOne { .. } => "SPECIFY_ONLY_ONE",
            ErrorKind::SpecifyOnlyOneMissing { .. } => "SPECIFY_ONLY_ONE_MISSING",
            ErrorKind::OneOfPrerequisitesNotDefined { .. } => "ONE_OF_PREREQUISITES_NOT_DEFINED",
            ErrorKind::CannotBeNull => "CANNOT_BE_NULL",
            ErrorKind::QuantityMustBeInt { .. } => "QUANTITY_MUST_BE_INT",
            ErrorKind::BeMoreSpecific { .. } => "BE_MORE_SPECIFIC",
            ErrorKind::MustBeDefined => "MUST_BE_DEFINED",
            ErrorKind::CannotBeEmpty => "CANNOT_BE_EMPTY",
            ErrorKind::InvalidPrimitiveType { .. } => "INVALID_PRIMITIVE_TYPE",
            ErrorKind::InvalidDns1035 { .. } => "INVALID_DNS_1035",
            ErrorKind::InvalidDns1123 { .. } => "INVALID_DNS_1123",
            ErrorKind::InvalidAlphaNumericDashUnderscore { .. } => {
                "INVALID_ALPHANUMERIC_DASH_UNDERSCORE"
            }
            ErrorKind::TooLong { .. } => "TOO_LONG",
            ErrorKind::MustBeGreaterThan { .. } => "MUST_BE_GREATER_THAN",
            ErrorKind::MustBeGreaterThanOrEqualTo { .. } => "MUST_BE_GREATER_THAN_OR_EQUAL_TO",
            ErrorKind::UnsupportedKey => "UNSUPPORTED_KEY",
            ErrorKind::InvalidProviderType { .. } => "INVALID_PROVIDER_TYPE",
            ErrorKind::InvalidQuantity { .. } => "INVALID_QUANTITY",
        }
    }
}

fn undefined_resource_message(name: &str, resource_types: &[ResourceType]) -> String {
    match resource_types {
        [] => format!("{} is not defined", user_str(name)),
        [only] => format!("{} {} is not defined", only, user_str(name)),
        many => {
            let names: Vec<&str> = many.iter().map(|t| t.as_str()).collect();
            format!("{} is not defined as a {}", user_str(name), strs_or(&names))
        }
    }
}

fn duplicate_resource_name_message(
    name: &str,
    resource_types: &[String],
    file_paths: &[String],
) -> String {
    let message = format!(
        "name {} must be unique across {}",
        user_str(name),
        strs_and(resource_types)
    );
    if file_paths.is_empty() {
        message
    } else {
        format!("{} (defined in {})", message, strs_and(file_paths))
    }
}

fn resource_wrong_type_message(
    name: &str,
    actual: &[ResourceType],
    valid: &[ResourceType],
) -> String {
    let actual: Vec<&str> = actual.iter().map(|t| t.as_str()).collect();
    format!(
        "{} is a {}, but only {} are allowed in this context",
        user_str(name),
        strs_and(&actual),
        strs_or(&plurals(valid))
    )
}

fn specify_all_or_none_message(keys: &[String]) -> String {
    match keys {
        [a, b] => format!(
            "please specify both {} and {} or neither of them",
            user_str(a),
            user_str(b)
        ),
        _ => format!("please specify all or none of {}", user_strs_and(keys)),
    }
}

fn specify_only_one_message(keys: &[String]) -> String {
    match keys {
        [a, b] => format!(
            "please specify either {} or {}, but not both",
            user_str(a),
            user_str(b)
        ),
        _ => format!("please specify exactly one of {}", user_strs_or(keys)),
    }
}

fn specify_only_one_missing_message(keys: &[String]) -> String {
    match keys {
        [a, b] => format!("please specify either {} or {}", user_str(a), user_str(b)),
        _ => format!("please specify one of {}", user_strs_or(keys)),
    }
}

/// A document error: a kind plus the breadcrumb trail leading to it.
///
/// Context is stored outermost first (file path, then resource, then key)
/// and only joined when the error is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    kind: ErrorKind,
    context: Vec<String>,
}

impl ConfigError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: Vec::new(),
        }
    }

    /// The innermost kind, unaffected by any wrapping.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// Prepend one breadcrumb.
    pub fn wrap(mut self, context: impl Into<String>) -> Self {
        self.context.insert(0, context.into());
        self
    }

    /// Prepend several breadcrumbs, keeping their order.
    pub fn wrap_all<S: AsRef<str>>(mut self, context: &[S]) -> Self {
        let outer = context.iter().map(|c| c.as_ref().to_string());
        self.context.splice(0..0, outer);
        self
    }
}

impl From<ErrorKind> for ConfigError {
    fn from(kind: ErrorKind) -> Self {
        ConfigError::new(kind)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for context in &self.context {
            write!(f, "{}: ", context)?;
        }
        write!(f, "{}", self.kind)
    }
}

impl Error for ConfigError {}

impl ModelctlError for ConfigError {
    fn error_code(&self) -> &'static str {
        self.kind.code()
    }

    fn is_user_error(&self) -> bool {
        !matches!(self.kind, ErrorKind::Unknown | ErrorKind::ReadConfig { .. })
    }
}

/// Errors loading the CLI's own TOML settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to parse settings file '{path}': {message}")]
    ParseError { path: String, message: String },

    #[error("Invalid output format '{format}'. Supported formats: table, json, yaml")]
    InvalidOutputFormat { format: String },

    #[error("Could not determine {what}")]
    MissingDirectory { what: String },

    #[error("IO error reading settings: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl ModelctlError for SettingsError {
    fn error_code(&self) -> &'static str {
        match self {
            SettingsError::ParseError { .. } => "SETTINGS_PARSE_ERROR",
            SettingsError::InvalidOutputFormat { .. } => "INVALID_OUTPUT_FORMAT",
            SettingsError::MissingDirectory { .. } => "SETTINGS_MISSING_DIRECTORY",
            SettingsError::IoError { .. } => "SETTINGS_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            SettingsError::ParseError { .. } | SettingsError::InvalidOutputFormat { .. }
        )
    }
}
