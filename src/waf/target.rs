use super::request::GatewayRequest;
use super::rules::Target;
use crate::config::HeaderScope;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde_json::Value;
use std::borrow::Cow;
use tracing::debug;

/// Bytes of body inspected by pattern rules.
pub const DEFAULT_INSPECT_BODY_BYTES: usize = 8192;

/// Gateways are not consistent about base64 padding; accept either form.
const BODY_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub inspect_body_bytes: usize,
    pub header_scope: HeaderScope,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            inspect_body_bytes: DEFAULT_INSPECT_BODY_BYTES,
            header_scope: HeaderScope::Referer,
        }
    }
}

/// The inspectable fields of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    pub query: String,
    pub body: String,
    /// Body length in bytes before truncation.
    pub body_len: usize,
    pub path: String,
    pub useragent: String,
    pub headers: String,
}

impl TargetSet {
    pub fn extract(request: &GatewayRequest, options: &ExtractOptions) -> Self {
        let query = request
            .query_string_parameters
            .as_ref()
            .map(|params| {
                params
                    .iter()
                    .map(|(key, value)| format!("{}={}", key, value))
                    .collect::<Vec<_>>()
                    .join("&")
            })
            .unwrap_or_default();

        let (raw_body, body_len) = decode_body(request);
        let body = truncate_to_boundary(&raw_body, options.inspect_body_bytes).to_string();

        let headers = match options.header_scope {
            HeaderScope::Referer => request.header("referer").unwrap_or("").to_string(),
            HeaderScope::All => render_headers(request),
        };

        Self {
            query,
            body,
            body_len,
            path: request.raw_request_path().to_string(),
            useragent: request.header("user-agent").unwrap_or("").to_string(),
            headers,
        }
    }

    pub fn get(&self, target: Target) -> &str {
        match target {
            Target::Query => &self.query,
            Target::Body => &self.body,
            Target::Path => &self.path,
            Target::UserAgent => &self.useragent,
            Target::Headers => &self.headers,
        }
    }
}

/// Body text before truncation and its length in bytes. Undecodable base64
/// yields an empty string, but the transport length is still reported so
/// the size guard sees it.
fn decode_body(request: &GatewayRequest) -> (Cow<'_, str>, usize) {
    let raw: Cow<'_, str> = match &request.body {
        None | Some(Value::Null) => return (Cow::Borrowed(""), 0),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(other) => Cow::Owned(other.to_string()),
    };

    if !request.is_base64_encoded {
        let len = raw.len();
        return (raw, len);
    }

    match BODY_BASE64.decode(raw.trim().as_bytes()) {
        Ok(bytes) => {
            // Replacement characters are wider than the bytes they stand for.
            let len = bytes.len();
            (Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()), len)
        }
        Err(e) => {
            debug!("Ignoring undecodable base64 body ({} bytes): {}", raw.len(), e);
            (Cow::Borrowed(""), raw.len())
        }
    }
}

pub(crate) fn truncate_to_boundary(value: &str, max_bytes: usize) -> &str {
    if value.len() <= max_bytes {
        return value;
    }
    let mut end = max_bytes;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

fn render_headers(request: &GatewayRequest) -> String {
    let Some(headers) = request.headers.as_ref() else {
        return String::new();
    };

    let mut lines: Vec<String> = headers
        .iter()
        .map(|(name, value)| format!("{}: {}", name.to_ascii_lowercase(), value))
        .collect();
    lines.sort();
    lines.join("\n")
}
