//! Per-field wire metadata for requests and responses.
//!
//! Every request type describes its fields as a list of [`Field`]s: the wire name, the
//! location the value travels in, and the serialization options. The composer reads
//! that list to build the HTTP request; nothing else about the request type is needed.
//! Responses go the other way through [`TaggedResponse`] and [`HeaderReader`].

use crate::metadata::RequestMetadata;
use crate::response::RawResponse;
use chrono::{DateTime, SecondsFormat, Utc};
use http::HeaderMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

/// Where a field's value travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Substituted into a `{name}` placeholder of the path template.
    Path,
    /// Appended to the query string.
    Query,
    /// Sent as a single HTTP header.
    Header,
    /// A map expanded into one header per entry, each name prefixed.
    HeaderCollection,
    /// The entire JSON body.
    Body,
    /// Merged into the top-level JSON body object next to other embedded fields.
    EmbeddedBody,
}

/// How a list-valued query parameter is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionFormat {
    /// One parameter with comma-joined values.
    #[default]
    Csv,
    /// The parameter repeated once per value.
    Multi,
}

/// Wire metadata of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTag {
    /// The wire name. For header collections this is the header prefix.
    pub name: &'static str,
    pub location: Location,
    /// Absent or empty values fail composition.
    pub mandatory: bool,
    /// Empty values are skipped instead of sent as empty.
    pub omit_empty: bool,
    pub collection_format: CollectionFormat,
}

/// A field value, already converted to its wire form.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Absent,
    Text(String),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
    Json(Value),
}

impl FieldValue {
    /// Returns `true` for values that would put nothing on the wire.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Absent => true,
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Map(entries) => entries.is_empty(),
            FieldValue::Json(value) => value.is_null(),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            FieldValue::Absent => "no value",
            FieldValue::Text(_) => "a scalar",
            FieldValue::List(_) => "a list",
            FieldValue::Map(_) => "a map",
            FieldValue::Json(_) => "a JSON document",
        }
    }
}

/// One field of a request: its tag plus its current value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub tag: FieldTag,
    pub value: FieldValue,
}

impl Field {
    fn new(name: &'static str, location: Location, value: FieldValue) -> Self {
        Field {
            tag: FieldTag {
                name,
                location,
                mandatory: false,
                omit_empty: false,
                collection_format: CollectionFormat::Csv,
            },
            value,
        }
    }

    fn scalar<T: ParamValue + ?Sized>(value: &T) -> FieldValue {
        match value.to_param() {
            Some(text) => FieldValue::Text(text),
            None => FieldValue::Absent,
        }
    }

    /// A path parameter. Path parameters are always mandatory.
    pub fn path<T: ParamValue + ?Sized>(name: &'static str, value: &T) -> Self {
        Field::new(name, Location::Path, Self::scalar(value)).mandatory()
    }

    pub fn query<T: ParamValue + ?Sized>(name: &'static str, value: &T) -> Self {
        Field::new(name, Location::Query, Self::scalar(value))
    }

    /// A list-valued query parameter rendered with `format`.
    pub fn query_list<T: ParamValue>(
        name: &'static str,
        values: Option<&[T]>,
        format: CollectionFormat,
    ) -> Self {
        let value = match values {
            Some(items) => {
                FieldValue::List(items.iter().filter_map(ParamValue::to_param).collect())
            }
            None => FieldValue::Absent,
        };
        let mut field = Field::new(name, Location::Query, value);
        field.tag.collection_format = format;
        field
    }

    pub fn header<T: ParamValue + ?Sized>(name: &'static str, value: &T) -> Self {
        Field::new(name, Location::Header, Self::scalar(value))
    }

    /// A map sent as one header per entry, named `prefix` + key.
    pub fn header_collection(
        prefix: &'static str,
        values: Option<&HashMap<String, String>>,
    ) -> Self {
        let value = match values {
            Some(map) => FieldValue::Map(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
            None => FieldValue::Absent,
        };
        Field::new(prefix, Location::HeaderCollection, value)
    }

    /// The whole request body. `None` serializes to an absent body.
    pub fn body<T: Serialize + ?Sized>(name: &'static str, value: &T) -> serde_json::Result<Self> {
        Ok(Field::new(name, Location::Body, Self::json(serde_json::to_value(value)?)))
    }

    /// A value merged under `name` into the top-level body object.
    pub fn embedded<T: Serialize + ?Sized>(
        name: &'static str,
        value: &T,
    ) -> serde_json::Result<Self> {
        Ok(Field::new(
            name,
            Location::EmbeddedBody,
            Self::json(serde_json::to_value(value)?),
        ))
    }

    fn json(value: Value) -> FieldValue {
        if value.is_null() {
            FieldValue::Absent
        } else {
            FieldValue::Json(value)
        }
    }

    pub fn mandatory(mut self) -> Self {
        self.tag.mandatory = true;
        self
    }

    pub fn omit_empty(mut self) -> Self {
        self.tag.omit_empty = true;
        self
    }
}

/// Conversion of a scalar field value to its wire text.
///
/// `None` means the value is absent and nothing is emitted for it.
pub trait ParamValue {
    fn to_param(&self) -> Option<String>;
}

impl ParamValue for str {
    fn to_param(&self) -> Option<String> {
        Some(self.to_owned())
    }
}

impl ParamValue for String {
    fn to_param(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl<T: ParamValue + ?Sized> ParamValue for &T {
    fn to_param(&self) -> Option<String> {
        (**self).to_param()
    }
}

impl<T: ParamValue> ParamValue for Option<T> {
    fn to_param(&self) -> Option<String> {
        self.as_ref()?.to_param()
    }
}

macro_rules! display_param {
    ($($ty:ty),+) => {
        $(
            impl ParamValue for $ty {
                fn to_param(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )+
    };
}

display_param!(bool, i32, i64, u16, u32, u64, usize, f32, f64);

/// Times are sent as RFC 3339 in UTC.
impl ParamValue for DateTime<Utc> {
    fn to_param(&self) -> Option<String> {
        Some(self.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

/// A request that can be composed into an HTTP request.
pub trait TaggedRequest {
    /// The fields of this request with their wire metadata.
    ///
    /// Fails only when a body value cannot be serialized to JSON.
    fn fields(&self) -> serde_json::Result<Vec<Field>>;

    /// Per-call options such as the retry policy.
    fn metadata(&self) -> &RequestMetadata;
}

/// A mutating request that carries an idempotency token.
pub trait IdempotentRequest: TaggedRequest {
    fn retry_token_mut(&mut self) -> &mut Option<String>;

    /// Fills the token slot with a fresh token if it is empty, and returns the token.
    ///
    /// A token the caller already set is left untouched, so repeated calls and
    /// retried attempts all carry the same value.
    fn ensure_retry_token(&mut self) -> &str {
        let slot = self.retry_token_mut();
        if slot.as_deref().map_or(true, str::is_empty) {
            *slot = Some(crate::retry::retry_token());
        }
        slot.as_deref().unwrap_or_default()
    }
}

/// The typed response of one operation.
///
/// Implemented through the `tagged_response!` macro; the decomposer fills headers
/// first, then the body.
pub trait TaggedResponse: Sized {
    /// The decoded body type, `()` for operations without one.
    type Body;

    /// A response with every header and body slot empty.
    fn from_raw(raw: RawResponse) -> Self;

    fn read_headers(&mut self, headers: &HeaderReader<'_>) -> Result<(), HeaderValueError>;

    fn set_body(&mut self, body: Self::Body);

    fn raw_response(&self) -> &RawResponse;
}

/// A response header whose value does not parse as the target type.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("header `{name}` has unparseable value {value:?}")]
pub struct HeaderValueError {
    pub name: String,
    pub value: String,
}

/// Case-insensitive typed access to response headers.
#[derive(Debug, Clone, Copy)]
pub struct HeaderReader<'a> {
    headers: &'a HeaderMap,
}

impl<'a> HeaderReader<'a> {
    pub fn new(headers: &'a HeaderMap) -> Self {
        HeaderReader { headers }
    }

    /// Reads and parses a header. A missing header is `Ok(None)`.
    pub fn get<T: FromStr>(&self, name: &str) -> Result<Option<T>, HeaderValueError> {
        let Some(value) = self.headers.get(name.to_ascii_lowercase().as_str()) else {
            return Ok(None);
        };
        let invalid = || HeaderValueError {
            name: name.to_string(),
            value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
        };
        let text = value.to_str().map_err(|_| invalid())?;
        text.trim().parse::<T>().map(Some).map_err(|_| invalid())
    }

    /// Collects every header starting with `prefix` into a map keyed by the rest of the name.
    pub fn collection(&self, prefix: &str) -> HashMap<String, String> {
        let prefix = prefix.to_ascii_lowercase();
        self.headers
            .iter()
            .filter_map(|(name, value)| {
                let key = name.as_str().strip_prefix(prefix.as_str())?;
                Some((key.to_string(), value.to_str().ok()?.to_string()))
            })
            .collect()
    }
}
