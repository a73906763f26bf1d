use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

string_enum! {
    /// Lifecycle of a volume attachment.
    pub enum VolumeAttachmentLifecycleState {
        Attaching = "ATTACHING",
        Attached = "ATTACHED",
        Detaching = "DETACHING",
        Detached = "DETACHED",
    }
}

/// Fields every volume attachment variant carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeAttachmentBase {
    pub id: String,
    pub availability_domain: String,
    pub compartment_id: String,
    pub instance_id: String,
    pub volume_id: String,
    pub lifecycle_state: VolumeAttachmentLifecycleState,
    pub time_created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_shareable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pv_encryption_in_transit_enabled: Option<bool>,
}

/// An iSCSI attachment. Connection details appear once the attachment is ready.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IScsiVolumeAttachment {
    #[serde(flatten)]
    pub base: VolumeAttachmentBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iqn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chap_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chap_secret: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParavirtualizedVolumeAttachment {
    #[serde(flatten)]
    pub base: VolumeAttachmentBase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmulatedVolumeAttachment {
    #[serde(flatten)]
    pub base: VolumeAttachmentBase,
}

tagged_union! {
    /// A volume attached to an instance.
    pub enum VolumeAttachment: "attachmentType" {
        "iscsi" => IScsi(IScsiVolumeAttachment),
        "paravirtualized" => Paravirtualized(ParavirtualizedVolumeAttachment),
        "emulated" => Emulated(EmulatedVolumeAttachment),
    }
}

impl VolumeAttachment {
    /// The shared fields, or `None` for a variant this client does not know.
    pub fn base(&self) -> Option<&VolumeAttachmentBase> {
        match self {
            VolumeAttachment::IScsi(attachment) => Some(&attachment.base),
            VolumeAttachment::Paravirtualized(attachment) => Some(&attachment.base),
            VolumeAttachment::Emulated(attachment) => Some(&attachment.base),
            VolumeAttachment::Unknown(_) => None,
        }
    }
}

/// Fields every attach request variant carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachVolumeBase {
    pub instance_id: String,
    pub volume_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_shareable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachIScsiVolumeDetails {
    #[serde(flatten)]
    pub base: AttachVolumeBase,
    /// Whether to use CHAP authentication for the iSCSI session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_chap: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachParavirtualizedVolumeDetails {
    #[serde(flatten)]
    pub base: AttachVolumeBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pv_encryption_in_transit_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachEmulatedVolumeDetails {
    #[serde(flatten)]
    pub base: AttachVolumeBase,
}

/// Lets the service pick the attachment type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachServiceDeterminedVolumeDetails {
    #[serde(flatten)]
    pub base: AttachVolumeBase,
}

tagged_union! {
    /// How to attach a volume.
    pub enum AttachVolumeDetails: "type" {
        "iscsi" => IScsi(AttachIScsiVolumeDetails),
        "paravirtualized" => Paravirtualized(AttachParavirtualizedVolumeDetails),
        "emulated" => Emulated(AttachEmulatedVolumeDetails),
        "service_determined" => ServiceDetermined(AttachServiceDeterminedVolumeDetails),
    }
}
