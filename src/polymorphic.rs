//! Two-pass decoding of discriminated JSON unions.
//!
//! Many payloads are "one of N record shapes" told apart by a discriminator field such
//! as `attachmentType` or `sourceType`. Decoding first reads the top-level object without
//! committing to a shape, looks the discriminator up in the union's dispatch table, and
//! then decodes the original bytes again as the concrete variant.
//!
//! A discriminator the table does not know never fails: the payload becomes an
//! [`UnknownVariant`] placeholder that keeps the raw JSON, so a newer service can
//! return new variants to an older client.

use serde::de::{Error as _, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// A discriminated union with a fixed dispatch table.
///
/// Implemented through the `tagged_union!` macro.
pub trait Polymorphic: Sized {
    /// The key of the discriminator field.
    const DISCRIMINATOR: &'static str;

    /// Decodes `raw` as the variant registered for `tag`, or `None` when the tag is unknown.
    fn from_variant(tag: &str, raw: &RawValue) -> Option<serde_json::Result<Self>>;

    fn from_unknown(unknown: UnknownVariant) -> Self;

    /// The discriminator value of this instance.
    fn discriminator(&self) -> Option<&str>;

    /// The placeholder, if this instance is a variant this client does not know.
    fn as_unknown(&self) -> Option<&UnknownVariant>;

    /// The JSON object for this instance, discriminator included.
    fn to_json(&self) -> serde_json::Result<Value>;
}

/// The placeholder for a payload whose discriminator is missing or unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    discriminator: Option<String>,
    raw: String,
}

impl UnknownVariant {
    /// The discriminator value as sent, if there was one.
    pub fn discriminator(&self) -> Option<&str> {
        self.discriminator.as_deref()
    }

    /// The payload exactly as received.
    pub fn raw_json(&self) -> &str {
        &self.raw
    }

    /// Decodes the preserved payload into a caller-supplied type.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.raw)
    }

    pub(crate) fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.raw)
    }

    fn to_raw(&self) -> serde_json::Result<Box<RawValue>> {
        RawValue::from_string(self.raw.clone())
    }
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// The top-level keys of an object with their values left undecoded.
struct ShallowObject<'a> {
    fields: HashMap<String, &'a RawValue>,
    repeated_keys: bool,
}

impl<'de> Deserialize<'de> for ShallowObject<'de> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ShallowVisitor;

        impl<'de> Visitor<'de> for ShallowVisitor {
            type Value = ShallowObject<'de>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut fields = HashMap::new();
                let mut repeated_keys = false;
                while let Some((key, value)) = map.next_entry::<String, &'de RawValue>()? {
                    repeated_keys |= fields.insert(key, value).is_some();
                }
                Ok(ShallowObject {
                    fields,
                    repeated_keys,
                })
            }
        }

        deserializer.deserialize_map(ShallowVisitor)
    }
}

/// Resolves one JSON object to a concrete variant of `T`.
pub fn resolve<T: Polymorphic>(raw: &RawValue) -> serde_json::Result<T> {
    // Shallow pass: keys only, values untouched. A repeated key keeps its last value.
    let shallow: ShallowObject<'_> = serde_json::from_str(raw.get())?;

    let discriminator = match shallow.fields.get(T::DISCRIMINATOR) {
        Some(value) => serde_json::from_str::<Option<String>>(value.get()).map_err(|_| {
            serde_json::Error::custom(format!(
                "discriminator `{}` must be a string, found {}",
                T::DISCRIMINATOR,
                value.get()
            ))
        })?,
        None => None,
    };

    if let Some(tag) = discriminator.as_deref() {
        // Variant records reject repeated fields, so they see the object with the
        // last value of each key.
        let deduplicated;
        let concrete = if shallow.repeated_keys {
            deduplicated = RawValue::from_string(serde_json::to_string(&shallow.fields)?)?;
            &*deduplicated
        } else {
            raw
        };
        if let Some(variant) = T::from_variant(tag, concrete) {
            return variant;
        }
    }

    tracing::debug!(
        discriminator_field = T::DISCRIMINATOR,
        discriminator = discriminator.as_deref().unwrap_or(""),
        "Unknown union variant, keeping raw payload"
    );

    Ok(T::from_unknown(UnknownVariant {
        discriminator,
        raw: raw.get().to_owned(),
    }))
}

/// Decodes a union payload. An empty or `null` payload is `Ok(None)`.
///
/// # Examples
///
/// ```
/// use coreservices::models::VolumeAttachment;
/// use coreservices::polymorphic;
///
/// let payload = br#"{"attachmentType":"fibreChannel","id":"A"}"#;
/// let attachment: VolumeAttachment = polymorphic::decode(payload).unwrap().unwrap();
/// assert!(attachment.is_unknown());
/// ```
pub fn decode<T: Polymorphic>(bytes: &[u8]) -> serde_json::Result<Option<T>> {
    if is_blank(bytes) {
        return Ok(None);
    }
    let raw: Box<RawValue> = serde_json::from_slice(bytes)?;
    if raw.get() == "null" {
        return Ok(None);
    }
    resolve(&raw).map(Some)
}

/// Decodes a JSON array whose elements each resolve independently.
pub fn decode_list<T: Polymorphic>(bytes: &[u8]) -> serde_json::Result<Option<Vec<T>>> {
    if is_blank(bytes) {
        return Ok(None);
    }
    let raw: Box<RawValue> = serde_json::from_slice(bytes)?;
    if raw.get() == "null" {
        return Ok(None);
    }
    let elements: Vec<&RawValue> = serde_json::from_str(raw.get())?;
    elements.into_iter().map(resolve::<T>).collect::<serde_json::Result<Vec<T>>>().map(Some)
}

/// Serializes a variant record and stamps the discriminator onto it.
///
/// The discriminator is always the variant's own value, even if the record carries a
/// field of the same name.
pub fn tagged_object<V: Serialize + ?Sized>(
    field: &str,
    tag: &str,
    variant: &V,
) -> serde_json::Result<Value> {
    match serde_json::to_value(variant)? {
        Value::Object(mut object) => {
            object.insert(field.to_string(), Value::String(tag.to_string()));
            Ok(Value::Object(object))
        }
        other => Err(serde_json::Error::custom(format!(
            "union variant `{}` must serialize to a JSON object, got {}",
            tag, other
        ))),
    }
}

/// `Serialize` body shared by every union. Placeholders are written back byte for byte.
pub fn serialize<T: Polymorphic, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::Error as _;
    match value.as_unknown() {
        Some(unknown) => unknown.to_raw().map_err(S::Error::custom)?.serialize(serializer),
        None => value.to_json().map_err(S::Error::custom)?.serialize(serializer),
    }
}

/// `Deserialize` body shared by every union, so unions nest inside ordinary records.
pub fn deserialize<'de, T: Polymorphic, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<T, D::Error> {
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    resolve(&raw).map_err(D::Error::custom)
}

/// Encodes each value, checks the discriminator it carries on the wire and decodes it back.
#[cfg(test)]
pub(crate) fn assert_round_trips<T>(cases: &[(&str, T)])
where
    T: Polymorphic + Serialize + PartialEq + fmt::Debug,
{
    for (tag, value) in cases {
        assert_eq!(value.discriminator(), Some(*tag));
        let encoded = serde_json::to_vec(value).unwrap();
        let wire: Value = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(wire[T::DISCRIMINATOR], *tag, "discriminator of {:?}", value);
        let decoded: T = decode(&encoded).unwrap().unwrap();
        assert_eq!(&decoded, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Circle {
        radius: f64,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Square {
        side: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    }

    tagged_union! {
        pub enum Shape: "kind" {
            "circle" => Circle(Circle),
            "square" => Square(Square),
        }
    }

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Drawing {
        shapes: Vec<Shape>,
        focus: Option<Shape>,
    }

    #[test]
    fn test_dispatch_on_discriminator() {
        let shape: Shape = decode(br#"{"kind":"square","side":2.0}"#).unwrap().unwrap();
        assert_eq!(shape, Shape::Square(Square { side: 2.0, label: None }));
        assert_eq!(shape.discriminator(), Some("square"));
    }

    #[test]
    fn test_round_trip_keeps_discriminator() {
        let shape = Shape::from(Circle { radius: 1.5 });
        let encoded = serde_json::to_vec(&shape).unwrap();
        let value: Value = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(value["kind"], "circle");

        let decoded: Shape = decode(&encoded).unwrap().unwrap();
        assert_eq!(decoded, shape);
    }

    #[test]
    fn test_unknown_discriminator_preserves_raw_payload() {
        let payload = r#"{"kind":"hexagon","side":3,"extra":[1,2]}"#;
        let shape: Shape = decode(payload.as_bytes()).unwrap().unwrap();

        let Shape::Unknown(unknown) = &shape else {
            panic!("expected placeholder, got {:?}", shape);
        };
        assert_eq!(unknown.discriminator(), Some("hexagon"));
        assert_eq!(unknown.raw_json(), payload);
        assert_eq!(serde_json::to_string(&shape).unwrap(), payload);
    }

    #[test]
    fn test_missing_discriminator_is_placeholder() {
        let shape: Shape = decode(br#"{"side":3}"#).unwrap().unwrap();
        assert!(shape.is_unknown());
        assert_eq!(shape.discriminator(), None);
    }

    #[test]
    fn test_non_string_discriminator_is_error() {
        let err = decode::<Shape>(br#"{"kind":7,"side":3}"#).unwrap_err();
        assert!(err.to_string().contains("kind"));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let shape: Shape = decode(br#"{"kind":"circle","kind":"square","side":1.0}"#)
            .unwrap()
            .unwrap();
        assert_eq!(shape.discriminator(), Some("square"));
    }

    #[test]
    fn test_repeated_variant_field_keeps_last_value() {
        let shape: Shape = decode(br#"{"kind":"square","side":1.0,"label":"a","side":4.0}"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            shape,
            Shape::Square(Square {
                side: 4.0,
                label: Some("a".into())
            })
        );
    }

    #[test]
    fn test_repeated_key_in_unknown_variant_keeps_raw_text() {
        let payload = r#"{"kind":"blob","size":1,"size":2}"#;
        let shape: Shape = decode(payload.as_bytes()).unwrap().unwrap();
        assert_eq!(shape.as_unknown().unwrap().raw_json(), payload);
    }

    #[test]
    fn test_every_shape_round_trips() {
        assert_round_trips(&[
            ("circle", Shape::from(Circle { radius: 0.5 })),
            (
                "square",
                Shape::from(Square {
                    side: 2.0,
                    label: Some("s".into()),
                }),
            ),
        ]);
    }

    #[test]
    fn test_empty_and_null_payloads_are_absent() {
        assert_eq!(decode::<Shape>(b"").unwrap(), None);
        assert_eq!(decode::<Shape>(b"  \n").unwrap(), None);
        assert_eq!(decode::<Shape>(b"null").unwrap(), None);
        assert_eq!(decode_list::<Shape>(b"null").unwrap(), None);
    }

    #[test]
    fn test_non_object_payload_is_error() {
        assert!(decode::<Shape>(b"[1,2]").is_err());
        assert!(decode::<Shape>(b"{\"kind\":").is_err());
    }

    #[test]
    fn test_list_resolves_each_element() {
        let shapes: Vec<Shape> = decode_list(
            br#"[{"kind":"circle","radius":1.0},{"kind":"blob"},{"kind":"square","side":2.0}]"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(shapes.len(), 3);
        assert!(matches!(shapes[0], Shape::Circle(_)));
        assert!(shapes[1].is_unknown());
        assert!(matches!(shapes[2], Shape::Square(_)));
    }

    #[test]
    fn test_unions_nest_inside_records() {
        let json = r#"{"shapes":[{"kind":"circle","radius":2.0},{"kind":"cone"}],"focus":null}"#;
        let drawing: Drawing = serde_json::from_str(json).unwrap();
        assert_eq!(drawing.shapes.len(), 2);
        assert!(drawing.shapes[1].is_unknown());
        assert_eq!(drawing.focus, None);

        let encoded = serde_json::to_string(&drawing).unwrap();
        let again: Drawing = serde_json::from_str(&encoded).unwrap();
        assert_eq!(again, drawing);
    }

    #[test]
    fn test_variant_field_cannot_override_discriminator() {
        #[derive(Debug, Clone, PartialEq, Serialize)]
        struct Sneaky {
            kind: String,
        }
        let value = tagged_object("kind", "circle", &Sneaky { kind: "square".into() }).unwrap();
        assert_eq!(value["kind"], "circle");
    }
}
