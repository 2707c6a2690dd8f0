use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, Request};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method};

/// The request attributes the authentication pipeline reads.
///
/// Decoupled from the axum body so strategies and tests never need a full
/// request; the pipeline only inspects, never writes.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub path: Option<String>,
    pub method: Method,
    pub headers: HeaderMap,
    pub remote_addr: Option<IpAddr>,
    pub host: Option<String>,
}

impl RequestInfo {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            method,
            headers: HeaderMap::new(),
            remote_addr: None,
            host: None,
        }
    }

    pub fn from_request(request: &Request) -> Self {
        let remote_addr = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        let host = request
            .headers()
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(strip_port)
            .or_else(|| request.uri().host().map(str::to_string));

        Self {
            path: Some(request.uri().path().to_string()),
            method: request.method().clone(),
            headers: request.headers().clone(),
            remote_addr,
            host,
        }
    }

    /// Adds a header, ignoring values that are not valid header text.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn with_remote_addr(mut self, addr: IpAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Header value as text; `None` when absent or not visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn authorization(&self) -> Option<&str> {
        self.header(header::AUTHORIZATION.as_str())
    }
}

fn strip_port(host: &str) -> String {
    // Bracketed IPv6 literal, e.g. "[::1]:8080"
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest).to_string();
    }
    host.split(':').next().unwrap_or(host).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn from_request_reads_host_without_port() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/portfolio/1/view")
            .header("host", "localhost:5201")
            .body(Body::empty())
            .unwrap();

        let info = RequestInfo::from_request(&request);
        assert_eq!(info.path.as_deref(), Some("/api/portfolio/1/view"));
        assert_eq!(info.method, Method::POST);
        assert_eq!(info.host.as_deref(), Some("localhost"));
        assert_eq!(info.remote_addr, None);
    }

    #[test]
    fn from_request_reads_connect_info() {
        let mut request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));

        let info = RequestInfo::from_request(&request);
        assert_eq!(info.remote_addr, Some(IpAddr::from([127, 0, 0, 1])));
    }

    #[test]
    fn strips_ipv6_host_port() {
        assert_eq!(strip_port("[::1]:5201"), "::1");
        assert_eq!(strip_port("example.com"), "example.com");
    }
}
