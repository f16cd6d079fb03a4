use crate::waf::request::{GatewayRequest, HttpContext, RequestContext};
use crate::waf::WafResponse;
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hyper::http::request::Parts;
use hyper::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use hyper::Response;
use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;

/// Parse HTTP headers into a HashMap
///
/// Converts an HTTP HeaderMap to a HashMap<String, String>.
/// Invalid UTF-8 header values are skipped.
pub fn parse_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut map = HashMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        if let Ok(value_str) = value.to_str() {
            map.insert(name.to_string(), value_str.to_string());
        }
    }
    map
}

/// Decode a raw query string into a parameter map.
///
/// Keys and values are percent-decoded once, as a gateway would before
/// handing parameters to a handler. Undecodable pairs are kept verbatim.
/// Later duplicates win.
pub fn parse_query(query: &str) -> BTreeMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(component: &str) -> String {
    urlencoding::decode(component)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| component.to_string())
}

/// Build the WAF's view of a request from hyper request parts.
///
/// Bodies that are not valid UTF-8 are carried base64-encoded, the way API
/// gateways forward binary payloads.
pub fn gateway_request_from_parts(
    parts: &Parts,
    body: &[u8],
    remote_addr: Option<SocketAddr>,
) -> GatewayRequest {
    let (body, is_base64_encoded) = if body.is_empty() {
        (None, false)
    } else {
        match std::str::from_utf8(body) {
            Ok(text) => (Some(serde_json::Value::String(text.to_string())), false),
            Err(_) => (Some(serde_json::Value::String(STANDARD.encode(body))), true),
        }
    };

    GatewayRequest {
        http_method: Some(parts.method.as_str().to_string()),
        path: Some(parts.uri.path().to_string()),
        raw_path: None,
        query_string_parameters: parts.uri.query().map(parse_query),
        headers: Some(parse_headers(&parts.headers)),
        body,
        is_base64_encoded,
        request_context: Some(RequestContext {
            identity: None,
            http: Some(HttpContext {
                method: Some(parts.method.as_str().to_string()),
                path: Some(parts.uri.path().to_string()),
                source_ip: remote_addr.map(|addr| addr.ip().to_string()),
            }),
        }),
    }
}

/// Convert a WAF denial into a hyper response.
pub fn into_http_response(response: WafResponse) -> Result<Response<String>> {
    let status = StatusCode::from_u16(response.status_code)
        .with_context(|| format!("Invalid status code: {}", response.status_code))?;

    let mut http_response = Response::new(response.body);
    *http_response.status_mut() = status;

    let headers = http_response.headers_mut();
    for (name, value) in &response.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .with_context(|| format!("Invalid header name: {}", name))?;
        let value = HeaderValue::from_str(value)
            .with_context(|| format!("Invalid header value for {}", name))?;
        headers.insert(name, value);
    }

    Ok(http_response)
}
