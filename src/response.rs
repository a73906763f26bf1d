//! Raw HTTP responses and their decomposition into typed operation responses.
//!
//! A [`RawResponse`] is read in full as soon as it arrives, which releases the
//! connection no matter how the call ends. The decomposer then fills a
//! [`TaggedResponse`]: headers first, then the body through a [`BodyDecoder`].

use crate::polymorphic::{self, Polymorphic};
use crate::schema::{HeaderReader, TaggedResponse};
use crate::{Error, Result};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::marker::PhantomData;
use url::Url;

/// An HTTP response with its body fully read.
///
/// Every typed response and every response-carrying error keeps one of these.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// The final URL of the request.
    pub url: Url,

    /// The drained response body.
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, url: Url, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            url,
            body: body.into(),
        }
    }

    /// Reads the whole body of `response`, releasing the underlying connection.
    pub async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let body = response.bytes().await?;
        Ok(Self::new(status, headers, url, body))
    }

    /// Returns a header value by name, case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// # use coreservices::RawResponse;
    /// # use http::{HeaderMap, HeaderValue, StatusCode};
    /// let mut headers = HeaderMap::new();
    /// headers.insert("opc-request-id", HeaderValue::from_static("abc"));
    /// let raw = RawResponse::new(
    ///     StatusCode::OK,
    ///     headers,
    ///     url::Url::parse("https://iaas.us-phoenix-1.oraclecloud.com/").unwrap(),
    ///     Vec::new(),
    /// );
    ///
    /// assert_eq!(raw.header("OPC-Request-Id"), Some("abc"));
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name.to_ascii_lowercase().as_str())?.to_str().ok()
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// How an operation's body is decoded.
pub trait BodyDecoder {
    type Output;

    /// Decodes `body`. `Ok(None)` leaves the body slot empty.
    fn decode(body: &[u8]) -> serde_json::Result<Option<Self::Output>>;
}

fn is_absent(body: &[u8]) -> bool {
    let trimmed = body.trim_ascii();
    trimmed.is_empty() || trimmed == b"null"
}

/// An ordinary JSON record.
pub struct Json<T>(PhantomData<T>);

impl<T: DeserializeOwned> BodyDecoder for Json<T> {
    type Output = T;

    fn decode(body: &[u8]) -> serde_json::Result<Option<T>> {
        if is_absent(body) {
            return Ok(None);
        }
        serde_json::from_slice(body).map(Some)
    }
}

/// A single discriminated union.
pub struct Union<T>(PhantomData<T>);

impl<T: Polymorphic> BodyDecoder for Union<T> {
    type Output = T;

    fn decode(body: &[u8]) -> serde_json::Result<Option<T>> {
        polymorphic::decode(body)
    }
}

/// A JSON array of discriminated unions.
pub struct UnionList<T>(PhantomData<T>);

impl<T: Polymorphic> BodyDecoder for UnionList<T> {
    type Output = Vec<T>;

    fn decode(body: &[u8]) -> serde_json::Result<Option<Vec<T>>> {
        polymorphic::decode_list(body)
    }
}

/// A body read as plain text rather than JSON.
pub struct PlainText;

impl BodyDecoder for PlainText {
    type Output = String;

    fn decode(body: &[u8]) -> serde_json::Result<Option<String>> {
        Ok(Some(String::from_utf8_lossy(body).into_owned()))
    }
}

/// Operations whose successful response carries no body.
pub struct NoBody;

impl BodyDecoder for NoBody {
    type Output = ();

    fn decode(_body: &[u8]) -> serde_json::Result<Option<()>> {
        Ok(None)
    }
}

/// Fills a typed response from a 2xx raw response.
///
/// Any header or body that fails to decode turns into [`Error::Decode`], which keeps
/// the raw response for inspection.
pub fn decompose<R, D>(raw: RawResponse) -> Result<R>
where
    R: TaggedResponse,
    D: BodyDecoder<Output = R::Body>,
{
    let headers = raw.headers.clone();
    let body = raw.body.clone();
    let mut response = R::from_raw(raw);

    let decoded = response
        .read_headers(&HeaderReader::new(&headers))
        .map_err(|e| e.to_string())
        .and_then(|()| D::decode(&body).map_err(|e| e.to_string()));

    match decoded {
        Ok(Some(body)) => {
            response.set_body(body);
            Ok(response)
        }
        Ok(None) => Ok(response),
        Err(reason) => {
            let raw = response.raw_response().clone();
            tracing::error!(
                status = raw.status.as_u16(),
                url = %raw.url,
                reason = %reason,
                "Failed to decode response"
            );
            Err(Error::Decode {
                reason,
                status: raw.status,
                raw: Box::new(raw),
            })
        }
    }
}
