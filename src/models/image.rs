use super::{DefinedTags, FreeformTags};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

string_enum! {
    pub enum ImageLifecycleState {
        Provisioning = "PROVISIONING",
        Importing = "IMPORTING",
        Available = "AVAILABLE",
        Exporting = "EXPORTING",
        Disabled = "DISABLED",
        Deleted = "DELETED",
    }
}

string_enum! {
    /// How the volumes of an instance launched from an image are attached.
    pub enum LaunchMode {
        Native = "NATIVE",
        Emulated = "EMULATED",
        Paravirtualized = "PARAVIRTUALIZED",
        Custom = "CUSTOM",
    }
}

string_enum! {
    /// Disk format of an imported image.
    pub enum SourceImageType {
        Qcow2 = "QCOW2",
        Vmdk = "VMDK",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSourceViaObjectStorageTupleDetails {
    pub namespace_name: String,
    pub bucket_name: String,
    pub object_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_image_type: Option<SourceImageType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_system_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSourceViaObjectStorageUriDetails {
    /// A pre-authenticated object storage URL.
    pub source_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_image_type: Option<SourceImageType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_system_version: Option<String>,
}

tagged_union! {
    /// Where an imported image is read from.
    pub enum ImageSourceDetails: "sourceType" {
        "objectStorageTuple" => ObjectStorageTuple(ImageSourceViaObjectStorageTupleDetails),
        "objectStorageUri" => ObjectStorageUri(ImageSourceViaObjectStorageUriDetails),
    }
}

/// A boot disk image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: String,
    pub compartment_id: String,
    pub create_image_allowed: bool,
    pub lifecycle_state: ImageLifecycleState,
    pub operating_system: String,
    pub operating_system_version: String,
    pub time_created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_mode: Option<LaunchMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_in_mbs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

/// Creates an image from an instance, or imports one from object storage.
///
/// Set exactly one of `instance_id` and `image_source_details`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateImageDetails {
    pub compartment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_source_details: Option<ImageSourceDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_mode: Option<LaunchMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportImageViaObjectStorageTupleDetails {
    pub namespace_name: String,
    pub bucket_name: String,
    pub object_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportImageViaObjectStorageUriDetails {
    /// A pre-authenticated object storage URL with write access.
    pub destination_uri: String,
}

tagged_union! {
    /// Where an exported image is written.
    pub enum ExportImageDetails: "destinationType" {
        "objectStorageTuple" => ObjectStorageTuple(ExportImageViaObjectStorageTupleDetails),
        "objectStorageUri" => ObjectStorageUri(ExportImageViaObjectStorageUriDetails),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polymorphic;

    #[test]
    fn test_export_destination_discriminator() {
        let details = ExportImageDetails::from(ExportImageViaObjectStorageUriDetails {
            destination_uri: "https://objectstorage.example/p/abc/o/image.qcow2".into(),
        });
        let encoded = serde_json::to_vec(&details).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(value["destinationType"], "objectStorageUri");

        let decoded: ExportImageDetails = polymorphic::decode(&encoded).unwrap().unwrap();
        assert_eq!(decoded, details);
    }

    #[test]
    fn test_every_image_source_round_trips() {
        polymorphic::assert_round_trips(&[
            (
                "objectStorageTuple",
                ImageSourceDetails::from(ImageSourceViaObjectStorageTupleDetails {
                    namespace_name: "ns".into(),
                    bucket_name: "b".into(),
                    object_name: "o".into(),
                    source_image_type: Some(SourceImageType::Qcow2),
                    ..Default::default()
                }),
            ),
            (
                "objectStorageUri",
                ImageSourceViaObjectStorageUriDetails {
                    source_uri: "https://objectstorage.example/p/abc/o/image.vmdk".into(),
                    operating_system: Some("Oracle Linux".into()),
                    operating_system_version: Some("8".into()),
                    ..Default::default()
                }
                .into(),
            ),
        ]);
    }

    #[test]
    fn test_every_export_destination_round_trips() {
        polymorphic::assert_round_trips(&[
            (
                "objectStorageTuple",
                ExportImageDetails::from(ExportImageViaObjectStorageTupleDetails {
                    namespace_name: "ns".into(),
                    bucket_name: "exports".into(),
                    object_name: "image.qcow2".into(),
                }),
            ),
            (
                "objectStorageUri",
                ExportImageViaObjectStorageUriDetails {
                    destination_uri: "https://objectstorage.example/p/abc/o/image.qcow2".into(),
                }
                .into(),
            ),
        ]);
    }

    #[test]
    fn test_image_source_tuple() {
        let payload = br#"{"sourceType":"objectStorageTuple","namespaceName":"ns",
            "bucketName":"b","objectName":"o","sourceImageType":"VMDK"}"#;
        let source: ImageSourceDetails = polymorphic::decode(payload).unwrap().unwrap();

        match source {
            ImageSourceDetails::ObjectStorageTuple(tuple) => {
                assert_eq!(tuple.bucket_name, "b");
                assert_eq!(tuple.source_image_type, Some(SourceImageType::Vmdk));
            }
            other => panic!("unexpected source {:?}", other),
        }
    }
}
