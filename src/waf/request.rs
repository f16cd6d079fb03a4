use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Inbound request as handed over by the router, in API Gateway event shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub raw_path: Option<String>,
    #[serde(default)]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    /// Either the raw body string or an already-parsed JSON document.
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    #[serde(default)]
    pub request_context: Option<RequestContext>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default)]
    pub identity: Option<Identity>,
    #[serde(default)]
    pub http: Option<HttpContext>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default)]
    pub source_ip: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpContext {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub source_ip: Option<String>,
}

impl GatewayRequest {
    pub fn method(&self) -> &str {
        self.http_method
            .as_deref()
            .or_else(|| self.http_context().and_then(|h| h.method.as_deref()))
            .unwrap_or("UNKNOWN")
    }

    /// Raw path as delivered, stage prefix included.
    pub fn raw_request_path(&self) -> &str {
        self.path
            .as_deref()
            .or(self.raw_path.as_deref())
            .unwrap_or("")
    }

    pub fn source_ip(&self) -> &str {
        let context = self.request_context.as_ref();
        context
            .and_then(|c| c.identity.as_ref())
            .and_then(|i| i.source_ip.as_deref())
            .or_else(|| self.http_context().and_then(|h| h.source_ip.as_deref()))
            .unwrap_or("unknown")
    }

    /// Header lookup: exact key, then lower-cased key, then any casing.
    pub fn header(&self, name: &str) -> Option<&str> {
        let headers = self.headers.as_ref()?;

        if let Some(value) = headers.get(name) {
            return Some(value.as_str());
        }
        if let Some(value) = headers.get(&name.to_ascii_lowercase()) {
            return Some(value.as_str());
        }
        headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn http_context(&self) -> Option<&HttpContext> {
        self.request_context.as_ref().and_then(|c| c.http.as_ref())
    }
}
