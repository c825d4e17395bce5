use elasticsearch::{
    auth::Credentials,
    cert::{Certificate, CertificateValidation},
    http::{
        headers::{HeaderMap, HeaderValue, CONTENT_TYPE},
        request::JsonBody,
        transport::{SingleNodeConnectionPool, TransportBuilder},
        Method,
    },
    Elasticsearch,
};
use futures::future::{BoxFuture, FutureExt};
use log::debug;
use serde_json::Value;

use crate::{
    config::EsConfig,
    error::{Error, Result},
};

use std::{fs, time::Duration};

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::StatusError {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// A single request against a fixed endpoint. Paths are relative to the
/// endpoint and may carry their own query string.
pub trait Transport {
    fn get(&self, path: &str) -> BoxFuture<'static, Result<RawResponse>>;

    fn post(&self, path: &str, body: Value) -> BoxFuture<'static, Result<RawResponse>>;

    fn delete(&self, path: &str, body: Value) -> BoxFuture<'static, Result<RawResponse>>;
}

/// Transport backed by a single-node elasticsearch connection.
#[derive(Clone)]
pub struct EsTransport {
    client: Elasticsearch,
    timeout: Option<Duration>,
}

impl EsTransport {
    pub fn new(config: &EsConfig) -> Result<Self> {
        let url = config.url()?;

        let mut builder = TransportBuilder::new(SingleNodeConnectionPool::new(url))
            .disable_proxy()
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some((user, pass)) = config.basic_auth() {
            builder = builder.auth(Credentials::Basic(user, pass));
        }

        if let Some(ref path) = config.ca_cert {
            let pem = fs::read(path)?;
            let cert = Certificate::from_pem(&pem)
                .map_err(|err| Error::ConfigError(format!("invalid ca certificate: {}", err)))?;
            builder = builder.cert_validation(CertificateValidation::Full(cert));
        }

        let transport = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("cannot build transport: {}", err)))?;

        Ok(Self {
            client: Elasticsearch::new(transport),
            timeout: config.request_timeout(),
        })
    }

    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> BoxFuture<'static, Result<RawResponse>> {
        let client = self.client.clone();
        let timeout = self.timeout;
        let path = path.to_owned();

        async move {
            debug!("sending {:?} {}", method, path);
            let resp = client
                .send(
                    method,
                    &path,
                    HeaderMap::new(),
                    None::<&()>,
                    body.map(JsonBody::from),
                    timeout,
                )
                .await?;
            let status = resp.status_code().as_u16();
            let body = resp.text().await?;
            Ok(RawResponse { status, body })
        }
        .boxed()
    }
}

impl Transport for EsTransport {
    fn get(&self, path: &str) -> BoxFuture<'static, Result<RawResponse>> {
        self.send(Method::Get, path, None)
    }

    fn post(&self, path: &str, body: Value) -> BoxFuture<'static, Result<RawResponse>> {
        self.send(Method::Post, path, Some(body))
    }

    fn delete(&self, path: &str, body: Value) -> BoxFuture<'static, Result<RawResponse>> {
        self.send(Method::Delete, path, Some(body))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_for_status() {
        assert!(RawResponse::new(200, "{}").error_for_status().is_ok());

        match RawResponse::new(404, "missing").error_for_status() {
            Err(Error::StatusError { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "missing");
            }
            _ => panic!("expected status error"),
        }
    }

    #[test]
    fn test_build_transport_without_network() {
        assert!(EsTransport::new(&EsConfig::default()).is_ok());
    }

    #[test]
    fn test_missing_ca_file_fails() {
        let config = EsConfig {
            ca_cert: Some("/nonexistent/ca.pem".into()),
            ..EsConfig::default()
        };
        assert!(matches!(EsTransport::new(&config), Err(Error::IoError(_))));
    }
}
