pub mod http;

pub use http::{gateway_request_from_parts, into_http_response, parse_headers, parse_query};
