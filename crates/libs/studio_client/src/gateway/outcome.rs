use common_types::{Envelope, ErrorBody};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A response decoded once, at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    Ok { data: T, message: String },
    /// 2xx transport, but the envelope reported `success: false`.
    Domain { message: String },
    /// Non-2xx status.
    Transport { status: StatusCode, message: String },
}

/// Decodes a raw response into an [`ApiOutcome`].
///
/// Preflight and no-content responses pass through as JSON `null`. A 2xx JSON
/// body without a boolean `success` field is not an envelope and is handed to
/// the caller unchanged.
pub fn decode_outcome<T: DeserializeOwned>(
    method: &Method,
    status: StatusCode,
    body: &[u8],
) -> Result<ApiOutcome<T>, serde_json::Error> {
    if !status.is_success() {
        return Ok(ApiOutcome::Transport {
            status,
            message: error_message(status, body),
        });
    }

    if *method == Method::OPTIONS
        || status == StatusCode::NO_CONTENT
        || body.iter().all(u8::is_ascii_whitespace)
    {
        return Ok(ApiOutcome::Ok {
            data: serde_json::from_value(Value::Null)?,
            message: String::new(),
        });
    }

    let value: Value = serde_json::from_slice(body)?;
    let Value::Object(envelope) = value else {
        return Ok(ApiOutcome::Ok {
            data: serde_json::from_value(value)?,
            message: String::new(),
        });
    };
    if !envelope.get("success").is_some_and(Value::is_boolean) {
        return Ok(ApiOutcome::Ok {
            data: serde_json::from_value(Value::Object(envelope))?,
            message: String::new(),
        });
    }

    let envelope: Envelope<Value> = serde_json::from_value(Value::Object(envelope))?;
    let message = envelope.message.unwrap_or_default();
    if !envelope.success {
        let message = if message.is_empty() {
            "Request failed".to_owned()
        } else {
            message
        };
        return Ok(ApiOutcome::Domain { message });
    }

    Ok(ApiOutcome::Ok {
        data: serde_json::from_value(envelope.data.unwrap_or(Value::Null))?,
        message,
    })
}

/// Best available message for an error response: the body's `message`, then
/// its `error`, then the status reason.
#[must_use]
pub fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status.canonical_reason().map_or_else(
                || format!("Request failed with status {}", status.as_u16()),
                ToOwned::to_owned,
            )
        })
}
