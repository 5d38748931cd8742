//! Character-set rules for names and labels.

use crate::errors::{ConfigError, ErrorKind};
use regex::Regex;
use std::sync::LazyLock;

/// Maximum length of a DNS label.
pub const DNS_LABEL_MAX_LEN: usize = 63;

static DNS_1035: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]([-a-z0-9]*[a-z0-9])?$").expect("DNS-1035 pattern is valid")
});

static DNS_1123: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("DNS-1123 pattern is valid")
});

static ALPHANUMERIC_DASH_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]+$").expect("alphanumeric pattern is valid")
});

/// A named string format a field can be required to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// Lowercase alphanumerics and `-`, starting with a letter.
    Dns1035,
    /// Lowercase alphanumerics and `-`, starting and ending alphanumeric.
    Dns1123,
    AlphaNumericDashUnderscore,
}

impl StringFormat {
    pub fn check(&self, value: &str) -> Result<(), ConfigError> {
        match self {
            StringFormat::Dns1035 => {
                check_label_len(value)?;
                if !DNS_1035.is_match(value) {
                    return Err(ErrorKind::InvalidDns1035 {
                        value: value.to_string(),
                    }
                    .into());
                }
            }
            StringFormat::Dns1123 => {
                check_label_len(value)?;
                if !DNS_1123.is_match(value) {
                    return Err(ErrorKind::InvalidDns1123 {
                        value: value.to_string(),
                    }
                    .into());
                }
            }
            StringFormat::AlphaNumericDashUnderscore => {
                if !ALPHANUMERIC_DASH_UNDERSCORE.is_match(value) {
                    return Err(ErrorKind::InvalidAlphaNumericDashUnderscore {
                        value: value.to_string(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

fn check_label_len(value: &str) -> Result<(), ConfigError> {
    if value.len() > DNS_LABEL_MAX_LEN {
        return Err(ErrorKind::TooLong {
            max_len: DNS_LABEL_MAX_LEN,
            len: value.len(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dns1035() {
        let f = StringFormat::Dns1035;
        assert!(f.check("iris").is_ok());
        assert!(f.check("iris-classifier-2").is_ok());
        assert!(f.check("a").is_ok());

        assert!(f.check("2iris").is_err());
        assert!(f.check("iris-").is_err());
        assert!(f.check("Iris").is_err());
        assert!(f.check("iris_classifier").is_err());
        assert!(f.check("").is_err());
    }

    #[test]
    fn test_dns1123() {
        let f = StringFormat::Dns1123;
        assert!(f.check("default").is_ok());
        assert!(f.check("2-team").is_ok());

        let err = f.check("My_Namespace").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidDns1123 { .. }));
        assert!(f.check("-team").is_err());
        assert!(f.check("team-").is_err());
    }

    #[test]
    fn test_label_length() {
        let ok = "a".repeat(63);
        let too_long = "a".repeat(64);
        assert!(StringFormat::Dns1123.check(&ok).is_ok());

        let err = StringFormat::Dns1035.check(&too_long).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::TooLong {
                max_len: 63,
                len: 64
            }
        );
    }

    #[test]
    fn test_alphanumeric_dash_underscore() {
        let f = StringFormat::AlphaNumericDashUnderscore;
        assert!(f.check("My_Deployment-1").is_ok());
        assert!(f.check("has space").is_err());
        assert!(f.check("dots.not.allowed").is_err());
        assert!(f.check("").is_err());
    }
}
