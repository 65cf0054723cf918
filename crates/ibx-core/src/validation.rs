//! Attribute validators
//!
//! Business rules belong to the remote API. The bridge only rejects values
//! the API would silently normalize.

use serde_json::Value;

use crate::error::{Error, Result};

/// Reject strings with leading or trailing whitespace
pub fn check_leading_trailing_spaces(value: &Value, key: &str) -> Result<()> {
    let Some(text) = value.as_str() else {
        return Err(Error::invalid_input(format!(
            "attribute `{}` must be a string",
            key
        )));
    };

    if text.trim() != text {
        return Err(Error::invalid_input(format!(
            "attribute `{}` must not contain leading or trailing spaces: {:?}",
            key, text
        )));
    }

    Ok(())
}
