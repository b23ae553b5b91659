use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionParseError {
    #[error("invalid option `{pair}`: expected key=value")]
    MissingEquals { pair: String },
    #[error("invalid option `{pair}`: key must not be empty")]
    EmptyKey { pair: String },
}

/// Parse a `k1=v1,k2=v2` option string into a map.
///
/// Keys and values are trimmed, and on duplicate keys the last occurrence
/// wins. Each segment is split at the first `=`, so values may contain `=`
/// themselves; a value containing `,` is truncated at the comma, since `,`
/// delimits segments. Empty input yields an empty map.
pub fn parse_pairs(input: &str) -> Result<HashMap<String, String>, OptionParseError> {
    let mut pairs = HashMap::new();

    for segment in input.split(',') {
        if segment.trim().is_empty() {
            continue;
        }

        let (key, value) = segment
            .split_once('=')
            .ok_or_else(|| OptionParseError::MissingEquals {
                pair: segment.trim().to_string(),
            })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(OptionParseError::EmptyKey {
                pair: segment.trim().to_string(),
            });
        }

        pairs.insert(key.to_string(), value.trim().to_string());
    }

    Ok(pairs)
}
