use listfetch_core::ResultPage;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{FailureKind, FetchError};

/// Decode a page body. With `results_field` set, entities are read from that
/// top-level field (`{"info": .., "results": [..]}`); otherwise the body itself
/// must be the array.
pub fn decode_results<T: DeserializeOwned>(
    body: &[u8],
    results_field: Option<&str>,
) -> Result<ResultPage<T>, FetchError> {
    let Some(field) = results_field else {
        return serde_json::from_slice(body).map_err(decode_error);
    };

    let mut envelope: Value = serde_json::from_slice(body).map_err(decode_error)?;
    let results = envelope
        .get_mut(field)
        .map(Value::take)
        .ok_or_else(|| FetchError::new(FailureKind::Decode, format!("missing `{field}` field")))?;
    serde_json::from_value(results).map_err(decode_error)
}

/// Extracts the service's error text from a JSON error body, if any.
pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(ToOwned::to_owned)
}

fn decode_error(err: serde_json::Error) -> FetchError {
    FetchError::new(FailureKind::Decode, err.to_string())
}
