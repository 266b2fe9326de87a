//! Per-route backend client.
//!
//! A [`BackendClient`] is created once per configured route at startup
//! and bound to that route's scheme, `host:port` and timeout. It owns a
//! pooled hyper client whose connect timeout is the route timeout, and
//! [`send`](BackendClient::send) bounds the whole exchange (connect,
//! request, full response body) by the same timeout. Clones share the
//! connection pool.

use std::fmt;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http::uri::{Authority, PathAndQuery, Scheme};
use http::{HeaderMap, Method, StatusCode, Uri};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::config::model::RouteSpec;
use crate::error::{BounceError, UpstreamError};

pub type HttpsConnector = hyper_rustls::HttpsConnector<HttpConnector>;
pub type HttpClient = Client<HttpsConnector, Full<Bytes>>;

/// A fully buffered backend response.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub latency: Duration,
}

#[derive(Clone)]
pub struct BackendClient {
    client: HttpClient,
    scheme: Scheme,
    authority: Authority,
    timeout: Duration,
}

impl fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendClient")
            .field("scheme", &self.scheme)
            .field("authority", &self.authority)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[must_use]
pub fn build_http_client(connect_timeout: Duration) -> HttpClient {
    // When multiple rustls crypto providers are compiled in, rustls cannot
    // auto-detect which one to use. Explicitly install `ring`.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let mut http = HttpConnector::new();
    http.set_connect_timeout(Some(connect_timeout));
    http.enforce_http(false);

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .wrap_connector(http);

    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

impl BackendClient {
    pub fn new(route: &RouteSpec) -> Result<Self, BounceError> {
        let authority_str = route.authority();
        let authority = authority_str
            .parse::<Authority>()
            .map_err(|e| BounceError::UriParse {
                authority: authority_str.clone(),
                source: Box::new(e),
            })?;

        let scheme = if route.tls { Scheme::HTTPS } else { Scheme::HTTP };

        Ok(Self {
            client: build_http_client(route.timeout()),
            scheme,
            authority,
            timeout: route.timeout(),
        })
    }

    #[must_use]
    pub const fn authority(&self) -> &Authority {
        &self.authority
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URI on this backend for an inbound path-and-query.
    pub fn uri_for(&self, path_and_query: PathAndQuery) -> Result<Uri, UpstreamError> {
        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .map_err(|e| UpstreamError::Protocol {
                source: Box::new(e),
            })
    }

    /// Send one request and buffer the response, all within the route timeout.
    ///
    /// `headers` become the outbound headers as-is. On expiry the in-flight
    /// exchange is dropped, which abandons the connection attempt or the
    /// pending response.
    pub async fn send(
        &self,
        method: Method,
        path_and_query: PathAndQuery,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let uri = self.uri_for(path_and_query)?;

        let mut request = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(body))
            .map_err(|e| UpstreamError::Protocol {
                source: Box::new(e),
            })?;
        *request.headers_mut() = headers;

        let start = Instant::now();
        let exchange = async {
            let response = self.client.request(request).await?;
            let (parts, body) = response.into_parts();
            let body = body
                .collect()
                .await
                .map_err(|e| UpstreamError::Protocol {
                    source: Box::new(e),
                })?
                .to_bytes();
            Ok::<_, UpstreamError>((parts, body))
        };

        let (parts, body) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| UpstreamError::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            })??;

        Ok(UpstreamResponse {
            status: parts.status,
            headers: parts.headers,
            body,
            latency: start.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_route_address_and_timeout() {
        let mut spec = RouteSpec::new("GET", "/test", "127.0.0.1", 9000);
        spec.timeout = 250;
        let backend = BackendClient::new(&spec).unwrap();
        assert_eq!(backend.authority().as_str(), "127.0.0.1:9000");
        assert_eq!(backend.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn uri_keeps_query_verbatim() {
        let spec = RouteSpec::new("GET", "/s", "localhost", 8081);
        let backend = BackendClient::new(&spec).unwrap();
        let uri = backend
            .uri_for(PathAndQuery::from_static("/s?q=a%20b&q=c"))
            .unwrap();
        assert_eq!(uri.to_string(), "http://localhost:8081/s?q=a%20b&q=c");
    }

    #[test]
    fn tls_routes_use_https() {
        let mut spec = RouteSpec::new("GET", "/", "example.com", 443);
        spec.tls = true;
        let backend = BackendClient::new(&spec).unwrap();
        let uri = backend.uri_for(PathAndQuery::from_static("/")).unwrap();
        assert_eq!(uri.scheme_str(), Some("https"));
    }

    #[test]
    fn invalid_authority_is_rejected() {
        let spec = RouteSpec::new("GET", "/", "bad host", 80);
        assert!(matches!(
            BackendClient::new(&spec),
            Err(BounceError::UriParse { .. })
        ));
    }

    #[tokio::test]
    async fn refused_connection_is_a_connection_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let spec = RouteSpec::new("GET", "/", "127.0.0.1", port);
        let backend = BackendClient::new(&spec).unwrap();
        let err = backend
            .send(
                Method::GET,
                PathAndQuery::from_static("/"),
                HeaderMap::new(),
                Bytes::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Connection { .. }), "{err:?}");
    }
}
