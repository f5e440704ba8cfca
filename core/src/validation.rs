use crate::error::{ApiError, Result};
use crate::types::Payload;

/// Check that every key in `required` is present in `data`.
///
/// All missing keys are reported together, in the order they were asked for.
pub fn validate_params(data: &Payload, required: &[&str]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|key| !data.contains_key(**key))
        .map(|key| key.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::ValidationError { missing })
    }
}
