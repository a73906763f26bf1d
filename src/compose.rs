//! Turns a tagged request into a concrete HTTP request.
//!
//! The composer is driven entirely by the request's [`Field`] list: path parameters fill
//! the template, query parameters are sorted by name, headers and header collections are
//! attached, and at most one body is serialized. Composition fails with
//! [`Error::InvalidRequest`] before anything touches the network.

use crate::schema::{CollectionFormat, Field, FieldValue, Location, TaggedRequest};
use crate::{Error, Result};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde_json::{Map, Value};
use url::Url;

/// A fully composed request, ready for signing and sending.
#[derive(Debug, Clone)]
pub struct ComposedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// Composes `request` against `endpoint` (host plus API version) and the
/// operation's path `template`.
///
/// # Examples
///
/// ```
/// use coreservices::compose::compose;
/// use coreservices::compute_management::StopInstancePoolRequest;
/// use http::Method;
///
/// let request = StopInstancePoolRequest {
///     instance_pool_id: "pool/42".to_string(),
///     ..Default::default()
/// };
/// let endpoint = url::Url::parse("https://iaas.us-phoenix-1.oraclecloud.com/20160918").unwrap();
/// let composed = compose(
///     Method::POST,
///     &endpoint,
///     "/instancePools/{instancePoolId}/actions/stop",
///     &request,
/// )
/// .unwrap();
///
/// assert_eq!(composed.url.path(), "/20160918/instancePools/pool%2F42/actions/stop");
/// ```
pub fn compose<R: TaggedRequest + ?Sized>(
    method: Method,
    endpoint: &Url,
    template: &str,
    request: &R,
) -> Result<ComposedRequest> {
    let fields = request.fields()?;
    check_mandatory(&fields)?;

    let mut url = endpoint.clone();
    fill_path(&mut url, template, &fields)?;

    let query = query_pairs(&fields)?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }

    let mut headers = header_map(&fields)?;
    let body = body_bytes(&fields)?;
    if body.is_some() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    Ok(ComposedRequest {
        method,
        url,
        headers,
        body,
    })
}

fn check_mandatory(fields: &[Field]) -> Result<()> {
    match fields.iter().find(|f| f.tag.mandatory && f.value.is_empty()) {
        Some(field) => Err(Error::InvalidRequest(format!(
            "mandatory field `{}` is missing or empty",
            field.tag.name
        ))),
        None => Ok(()),
    }
}

fn fill_path(url: &mut Url, template: &str, fields: &[Field]) -> Result<()> {
    if url.cannot_be_a_base() {
        return Err(Error::InvalidConfiguration(format!(
            "endpoint `{}` cannot carry a path",
            url
        )));
    }
    let mut segments = url
        .path_segments_mut()
        .map_err(|_| Error::InvalidConfiguration("endpoint cannot carry a path".to_string()))?;
    segments.pop_if_empty();

    // Trailing empty segments are kept: `/volumeAttachments/` ends in a slash on the wire.
    for segment in template.trim_start_matches('/').split('/') {
        let filled = fill_segment(segment, fields)?;
        // The URL layer resolves dot segments instead of encoding them.
        if filled == "." || filled == ".." {
            return Err(Error::InvalidRequest(format!(
                "path segment `{}` of `{}` would address a different resource",
                filled, template
            )));
        }
        segments.push(&filled);
    }
    Ok(())
}

fn fill_segment(segment: &str, fields: &[Field]) -> Result<String> {
    let mut filled = String::with_capacity(segment.len());
    let mut rest = segment;

    while let Some(open) = rest.find('{') {
        let close = rest[open..]
            .find('}')
            .map(|offset| open + offset)
            .ok_or_else(|| {
                Error::InvalidRequest(format!("unterminated placeholder in `{}`", segment))
            })?;
        filled.push_str(&rest[..open]);
        filled.push_str(path_value(&rest[open + 1..close], fields)?);
        rest = &rest[close + 1..];
    }
    filled.push_str(rest);
    Ok(filled)
}

fn path_value<'f>(name: &str, fields: &'f [Field]) -> Result<&'f str> {
    let field = fields
        .iter()
        .find(|f| f.tag.location == Location::Path && f.tag.name == name)
        .ok_or_else(|| {
            Error::InvalidRequest(format!("no value bound to path placeholder `{{{}}}`", name))
        })?;

    match &field.value {
        FieldValue::Text(value) if !value.is_empty() => Ok(value),
        FieldValue::Text(_) | FieldValue::Absent => {
            Err(Error::InvalidRequest(format!("path parameter `{}` is empty", name)))
        }
        other => Err(Error::InvalidRequest(format!(
            "path parameter `{}` cannot be {}",
            name,
            other.kind()
        ))),
    }
}

fn query_pairs(fields: &[Field]) -> Result<Vec<(&'static str, String)>> {
    let mut pairs = Vec::new();

    for field in fields.iter().filter(|f| f.tag.location == Location::Query) {
        let name = field.tag.name;
        if field.tag.omit_empty && field.value.is_empty() {
            continue;
        }
        match &field.value {
            FieldValue::Absent => {}
            FieldValue::Text(value) => pairs.push((name, value.clone())),
            FieldValue::List(values) => match field.tag.collection_format {
                CollectionFormat::Csv => pairs.push((name, values.join(","))),
                CollectionFormat::Multi => pairs.extend(values.iter().map(|v| (name, v.clone()))),
            },
            other => {
                return Err(Error::InvalidRequest(format!(
                    "query parameter `{}` cannot be {}",
                    name,
                    other.kind()
                )))
            }
        }
    }

    // Stable: repeated `multi` values keep their order.
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    Ok(pairs)
}

fn header_map(fields: &[Field]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    for field in fields {
        let name = field.tag.name;
        match (field.tag.location, &field.value) {
            (Location::Header | Location::HeaderCollection, value)
                if value.is_empty() && field.tag.omit_empty => {}
            (Location::Header | Location::HeaderCollection, FieldValue::Absent) => {}
            (Location::Header, FieldValue::Text(value)) => {
                headers.append(header_name(name)?, header_value(name, value)?);
            }
            (Location::Header, FieldValue::List(values)) => {
                for value in values {
                    headers.append(header_name(name)?, header_value(name, value)?);
                }
            }
            (Location::HeaderCollection, FieldValue::Map(entries)) => {
                for (key, value) in entries {
                    let full = format!("{}{}", name, key);
                    headers.append(header_name(&full)?, header_value(&full, value)?);
                }
            }
            (Location::Header | Location::HeaderCollection, other) => {
                return Err(Error::InvalidRequest(format!(
                    "header `{}` cannot be {}",
                    name,
                    other.kind()
                )))
            }
            _ => {}
        }
    }
    Ok(headers)
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::try_from(name)
        .map_err(|e| Error::InvalidRequest(format!("invalid header name `{}`: {}", name, e)))
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::try_from(value).map_err(|e| {
        Error::InvalidRequest(format!("invalid value for header `{}`: {}", name, e))
    })
}

fn body_bytes(fields: &[Field]) -> Result<Option<Vec<u8>>> {
    let whole: Vec<&Field> = fields
        .iter()
        .filter(|f| f.tag.location == Location::Body)
        .collect();
    let embedded: Vec<&Field> = fields
        .iter()
        .filter(|f| f.tag.location == Location::EmbeddedBody)
        .collect();

    if whole.len() > 1 {
        return Err(Error::InvalidRequest(format!(
            "request declares {} body fields; at most one is allowed",
            whole.len()
        )));
    }
    if !whole.is_empty() && !embedded.is_empty() {
        return Err(Error::InvalidRequest(
            "request mixes a whole-body field with embedded body fields".to_string(),
        ));
    }

    if let Some(field) = whole.first() {
        return match &field.value {
            FieldValue::Absent => Ok(None),
            FieldValue::Json(value) => Ok(Some(serde_json::to_vec(value)?)),
            other => Err(Error::InvalidRequest(format!(
                "body `{}` cannot be {}",
                field.tag.name,
                other.kind()
            ))),
        };
    }

    if embedded.is_empty() {
        return Ok(None);
    }

    let mut merged = Map::new();
    for field in embedded {
        match &field.value {
            FieldValue::Absent => {}
            FieldValue::Json(value) => {
                merged.insert(field.tag.name.to_string(), value.clone());
            }
            other => {
                return Err(Error::InvalidRequest(format!(
                    "embedded body field `{}` cannot be {}",
                    field.tag.name,
                    other.kind()
                )))
            }
        }
    }
    Ok(Some(serde_json::to_vec(&Value::Object(merged))?))
}
