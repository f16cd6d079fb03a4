use serde::Serialize;
use std::collections::BTreeMap;

pub const HEADER_WAF_BLOCK: &str = "X-WAF-Block";

/// Denial returned to the router, in API Gateway proxy response shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WafResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    /// Why the request was denied. Not part of the wire response.
    #[serde(skip)]
    pub message: String,
}

#[derive(Serialize)]
struct ForbiddenBody<'a> {
    error: &'a str,
    code: &'a str,
}

pub fn forbidden(rule_id: &str, message: &str) -> WafResponse {
    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
    headers.insert(HEADER_WAF_BLOCK.to_string(), rule_id.to_string());

    let body = serde_json::to_string(&ForbiddenBody {
        error: "Forbidden",
        code: rule_id,
    })
    .unwrap_or_else(|_| r#"{"error":"Forbidden"}"#.to_string());

    WafResponse {
        status_code: 403,
        headers,
        body,
        message: message.to_string(),
    }
}
