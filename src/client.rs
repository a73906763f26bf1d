//! The shared invoker behind every service facade.
//!
//! [`BaseClient`] owns the connection pool, the resolved service host, the
//! configuration provider and the optional request signer. A facade hands it an
//! [`Operation`] and a typed request; it composes, signs and sends each attempt under
//! the request's retry policy and decomposes the final response.

use crate::compose::{self, ComposedRequest};
use crate::config::{self, ConfigurationProvider};
use crate::error::ServiceError;
use crate::region;
use crate::response::{self, BodyDecoder, RawResponse};
use crate::retry::{self, RetryPolicy};
use crate::schema::{TaggedRequest, TaggedResponse};
use crate::{Error, Result};
use http::header::{DATE, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use std::sync::Arc;
use std::time::{Instant, SystemTime};
use tokio_util::sync::CancellationToken;
use url::Url;

const DEFAULT_USER_AGENT: &str = concat!("coreservices-rust/", env!("CARGO_PKG_VERSION"));

/// Signs an outgoing request, typically by adding an `authorization` header.
///
/// The signer sees the request exactly as it will be sent, `date` and body included.
pub trait RequestSigner: Send + Sync {
    fn sign(&self, request: &mut reqwest::Request, key_id: &str) -> Result<()>;
}

/// Where a service lives and which API version it speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceEndpoint {
    /// Host template with `{region}` and `{secondLevelDomain}` placeholders.
    pub template: &'static str,
    /// API version prefix of every path.
    pub base_path: &'static str,
}

/// One operation of a service: its name for logs, its method and its path template.
#[derive(Debug, Clone)]
pub struct Operation {
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
}

impl Operation {
    pub fn new(name: &'static str, method: Method, path: &'static str) -> Self {
        Self { name, method, path }
    }
}

/// The invoker shared by the facades. Cheap to clone.
#[derive(Clone)]
pub struct BaseClient {
    inner: Arc<ClientInner>,
}

#[derive(Clone)]
struct ClientInner {
    http_client: reqwest::Client,
    service: ServiceEndpoint,
    host: Url,
    config: Arc<dyn ConfigurationProvider>,
    signer: Option<Arc<dyn RequestSigner>>,
    default_headers: HeaderMap,
}

impl BaseClient {
    /// Builds an invoker for `service`, with the host derived from the configured region.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the configuration is incomplete or the
    /// region does not yield a valid host.
    pub fn new(config: Arc<dyn ConfigurationProvider>, service: ServiceEndpoint) -> Result<Self> {
        config::validate(config.as_ref())?;
        let host = region::endpoint_for(service.template, &config.region()?)?;

        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| {
                Error::InvalidConfiguration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                service,
                host,
                config,
                signer: None,
                default_headers: HeaderMap::new(),
            }),
        })
    }

    /// Rebinds the host to the endpoint of `region`.
    pub fn set_region(&mut self, region: &str) -> Result<()> {
        let host = region::endpoint_for(self.inner.service.template, region)?;
        tracing::debug!(region = region, host = %host, "Rebinding service host");
        Arc::make_mut(&mut self.inner).host = host;
        Ok(())
    }

    /// Overrides the host outright, for private endpoints and test servers.
    pub fn set_host(&mut self, host: &str) -> Result<()> {
        let host = Url::parse(host)?;
        if host.cannot_be_a_base() {
            return Err(Error::InvalidConfiguration(format!("host `{}` cannot carry a path", host)));
        }
        Arc::make_mut(&mut self.inner).host = host;
        Ok(())
    }

    pub fn set_signer(&mut self, signer: Arc<dyn RequestSigner>) {
        Arc::make_mut(&mut self.inner).signer = Some(signer);
    }

    pub fn set_http_client(&mut self, http_client: reqwest::Client) {
        Arc::make_mut(&mut self.inner).http_client = http_client;
    }

    /// Adds a header sent with every request of this client.
    pub fn set_default_header(&mut self, name: &str, value: &str) -> Result<()> {
        let name = HeaderName::try_from(name)
            .map_err(|e| Error::InvalidConfiguration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value)
            .map_err(|e| Error::InvalidConfiguration(format!("Invalid header value: {}", e)))?;
        Arc::make_mut(&mut self.inner).default_headers.insert(name, value);
        Ok(())
    }

    /// The current service host.
    pub fn host(&self) -> &Url {
        &self.inner.host
    }

    /// The host with the API version prefix appended.
    pub fn endpoint(&self) -> Result<Url> {
        let mut endpoint = self.inner.host.clone();
        endpoint
            .path_segments_mut()
            .map_err(|_| {
                Error::InvalidConfiguration(format!(
                    "host `{}` cannot carry a path",
                    self.inner.host
                ))
            })?
            .pop_if_empty()
            .push(self.inner.service.base_path);
        Ok(endpoint)
    }

    pub fn configuration_provider(&self) -> &Arc<dyn ConfigurationProvider> {
        &self.inner.config
    }

    /// Runs `operation` for `request` under the request's retry policy.
    ///
    /// Without a caller-supplied policy the call makes exactly one attempt.
    pub async fn call<Req, Res, D>(
        &self,
        cancel: &CancellationToken,
        operation: Operation,
        request: &Req,
    ) -> Result<Res>
    where
        Req: TaggedRequest,
        Res: TaggedResponse,
        D: BodyDecoder<Output = Res::Body>,
    {
        let no_retry;
        let policy = match request.metadata().retry_policy() {
            Some(policy) => policy,
            None => {
                no_retry = RetryPolicy::no_retry();
                &no_retry
            }
        };

        let operation = &operation;
        retry::execute(cancel, policy, |attempt| {
            self.attempt::<Req, Res, D>(operation, request, attempt)
        })
        .await
    }

    async fn attempt<Req, Res, D>(
        &self,
        operation: &Operation,
        request: &Req,
        attempt: u32,
    ) -> Result<Res>
    where
        Req: TaggedRequest,
        Res: TaggedResponse,
        D: BodyDecoder<Output = Res::Body>,
    {
        let composed = compose::compose(
            operation.method.clone(),
            &self.endpoint()?,
            operation.path,
            request,
        )?;
        let http_request = self.build_request(composed)?;

        tracing::debug!(
            operation = operation.name,
            method = %http_request.method(),
            url = %http_request.url(),
            attempt = attempt,
            "Executing HTTP request"
        );

        let started = Instant::now();
        let response = self.inner.http_client.execute(http_request).await?;
        let raw = RawResponse::read(response).await?;

        tracing::info!(
            operation = operation.name,
            status = raw.status.as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            attempt = attempt,
            "Received HTTP response"
        );

        if !raw.status.is_success() {
            let failure = ServiceError::from_raw(raw);
            let error = Error::from(failure);
            if error.is_retryable() {
                tracing::warn!(operation = operation.name, error = %error, "Service error");
            } else {
                tracing::error!(operation = operation.name, error = %error, "Service error");
            }
            return Err(error);
        }

        response::decompose::<Res, D>(raw)
    }

    fn build_request(&self, composed: ComposedRequest) -> Result<reqwest::Request> {
        let mut builder = self
            .inner
            .http_client
            .request(composed.method, composed.url)
            .header(USER_AGENT, DEFAULT_USER_AGENT)
            .header(DATE, httpdate::fmt_http_date(SystemTime::now()))
            .headers(self.inner.default_headers.clone())
            .headers(composed.headers);

        if let Some(body) = composed.body {
            builder = builder.body(body);
        }

        let mut request = builder
            .build()
            .map_err(|e| Error::InvalidRequest(format!("Failed to build HTTP request: {}", e)))?;

        if let Some(signer) = &self.inner.signer {
            signer.sign(&mut request, &self.inner.config.key_id()?)?;
        }
        Ok(request)
    }
}
