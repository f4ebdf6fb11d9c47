//! HTTP transport to timestamp authorities, backed by `reqwest`.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Identity};
use std::time::Duration;
use tracing::debug;

use crate::ports::outbound::{
    TransportError, TsaHttpRequest, TsaHttpResponse, TsaTransport, TIMESTAMP_QUERY_CONTENT_TYPE,
    TIMESTAMP_REPLY_CONTENT_TYPE,
};

/// Upper bound on establishing a connection, below the request timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// `reqwest`-based implementation of `TsaTransport`.
///
/// The shared client is reused across requests; a dedicated client is built
/// for authorities that require a TLS client identity.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a new transport.
    pub fn new() -> Result<Self, TransportError> {
        Ok(Self {
            client: Self::builder()
                .build()
                .map_err(|e| TransportError::Client(e.to_string()))?,
        })
    }

    fn builder() -> reqwest::ClientBuilder {
        Client::builder().connect_timeout(CONNECT_TIMEOUT)
    }

    fn client_for(&self, client_cert: Option<&str>) -> Result<Client, TransportError> {
        match client_cert {
            None => Ok(self.client.clone()),
            Some(pem) => {
                let identity = Identity::from_pem(pem.as_bytes())
                    .map_err(|e| TransportError::Client(format!("client identity: {e}")))?;
                Self::builder()
                    .identity(identity)
                    .build()
                    .map_err(|e| TransportError::Client(e.to_string()))
            }
        }
    }
}

fn map_error(error: reqwest::Error, timeout: Duration) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(timeout)
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Http(error.to_string())
    }
}

#[async_trait::async_trait]
impl TsaTransport for ReqwestTransport {
    async fn post_query(&self, request: TsaHttpRequest) -> Result<TsaHttpResponse, TransportError> {
        let client = self.client_for(request.client_cert.as_deref())?;

        let mut builder = client
            .post(&request.url)
            .timeout(request.timeout)
            .header(CONTENT_TYPE, TIMESTAMP_QUERY_CONTENT_TYPE)
            .header(ACCEPT, TIMESTAMP_REPLY_CONTENT_TYPE)
            .body(request.body);
        if let Some(credentials) = &request.credentials {
            builder = builder.basic_auth(&credentials.username, Some(&credentials.password));
        }

        debug!(tsa_url = %request.url, "Posting timestamp query");
        let response = builder
            .send()
            .await
            .map_err(|e| map_error(e, request.timeout))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| map_error(e, request.timeout))?
            .to_vec();

        Ok(TsaHttpResponse {
            status,
            content_type,
            body,
        })
    }
}
