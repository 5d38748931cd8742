//! Helpers for rendering user-facing values inside error messages.

/// Quote a user-provided value so it stands out in a message.
pub fn user_str(s: &str) -> String {
    format!("\"{}\"", s)
}

/// Join items as an English list using "and".
///
/// `["a", "b", "c"]` renders as `a, b, and c`.
pub fn strs_and<S: AsRef<str>>(items: &[S]) -> String {
    join_english(items, "and")
}

/// Join items as an English list using "or".
pub fn strs_or<S: AsRef<str>>(items: &[S]) -> String {
    join_english(items, "or")
}

/// Quote every item, then join with "and".
pub fn user_strs_and<S: AsRef<str>>(items: &[S]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| user_str(s.as_ref())).collect();
    strs_and(&quoted)
}

/// Quote every item, then join with "or".
pub fn user_strs_or<S: AsRef<str>>(items: &[S]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| user_str(s.as_ref())).collect();
    strs_or(&quoted)
}

/// Render a zero-based document position.
pub fn index(i: usize) -> String {
    format!("index {}", i)
}

fn join_english<S: AsRef<str>>(items: &[S], conjunction: &str) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} {} {}", first.as_ref(), conjunction, second.as_ref()),
        [rest @ .., last] => {
            let head: Vec<&str> = rest.iter().map(|s| s.as_ref()).collect();
            format!("{}, {} {}", head.join(", "), conjunction, last.as_ref())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_str_quotes() {
        assert_eq!(user_str("foo"), "\"foo\"");
        assert_eq!(user_str(""), "\"\"");
    }

    #[test]
    fn test_strs_and() {
        let empty: [&str; 0] = [];
        assert_eq!(strs_and(&empty), "");
        assert_eq!(strs_and(&["a"]), "a");
        assert_eq!(strs_and(&["a", "b"]), "a and b");
        assert_eq!(strs_and(&["a", "b", "c"]), "a, b, and c");
    }

    #[test]
    fn test_strs_or_quoted() {
        assert_eq!(user_strs_or(&["x", "y"]), "\"x\" or \"y\"");
        assert_eq!(
            user_strs_and(&["x", "y", "z"]),
            "\"x\", \"y\", and \"z\""
        );
    }

    #[test]
    fn test_index() {
        assert_eq!(index(0), "index 0");
        assert_eq!(index(12), "index 12");
    }
}
