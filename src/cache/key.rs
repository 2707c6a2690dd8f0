use std::fmt::Display;

pub const KEY_DELIMITER: &str = ":";

/// Builds a cache key such as `portfolio:42:null`.
///
/// `None` parts render as the literal `null` so keys stay positional.
pub fn generate_key(prefix: &str, parts: &[Option<&dyn Display>]) -> String {
    let mut key = String::from(prefix);
    for part in parts {
        key.push_str(KEY_DELIMITER);
        match part {
            Some(value) => key.push_str(&value.to_string()),
            None => key.push_str("null"),
        }
    }
    key
}
