use super::{DefinedTags, FreeformTags};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConfigurationIscsiAttachVolumeDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_chap: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConfigurationParavirtualizedAttachVolumeDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pv_encryption_in_transit_enabled: Option<bool>,
}

tagged_union! {
    /// How a block volume of a configuration is attached.
    pub enum InstanceConfigurationAttachVolumeDetails: "type" {
        "iscsi" => IScsi(InstanceConfigurationIscsiAttachVolumeDetails),
        "paravirtualized" =>
            Paravirtualized(InstanceConfigurationParavirtualizedAttachVolumeDetails),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConfigurationVolumeSourceFromVolumeDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConfigurationVolumeSourceFromVolumeBackupDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

tagged_union! {
    pub enum InstanceConfigurationVolumeSourceDetails: "type" {
        "volume" => Volume(InstanceConfigurationVolumeSourceFromVolumeDetails),
        "volumeBackup" => VolumeBackup(InstanceConfigurationVolumeSourceFromVolumeBackupDetails),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConfigurationCreateVolumeDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compartment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_in_gbs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_details: Option<InstanceConfigurationVolumeSourceDetails>,
}

/// A block volume created or attached with each launched instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConfigurationBlockVolumeDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attach_details: Option<InstanceConfigurationAttachVolumeDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_details: Option<InstanceConfigurationCreateVolumeDetails>,
    /// An existing volume to attach instead of creating one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConfigurationInstanceSourceViaImageDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot_volume_size_in_gbs: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConfigurationInstanceSourceViaBootVolumeDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot_volume_id: Option<String>,
}

tagged_union! {
    pub enum InstanceConfigurationInstanceSourceDetails: "sourceType" {
        "image" => Image(InstanceConfigurationInstanceSourceViaImageDetails),
        "bootVolume" => BootVolume(InstanceConfigurationInstanceSourceViaBootVolumeDetails),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConfigurationCreateVnicDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assign_public_ip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Launch parameters applied to every instance created from a configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConfigurationLaunchInstanceDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compartment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_details: Option<InstanceConfigurationInstanceSourceDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_vnic_details: Option<InstanceConfigurationCreateVnicDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

/// A plain compute instance with optional block volumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeInstanceDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_volumes: Option<Vec<InstanceConfigurationBlockVolumeDetails>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_details: Option<InstanceConfigurationLaunchInstanceDetails>,
}

tagged_union! {
    /// The kind of instance a configuration launches.
    pub enum InstanceConfigurationInstanceDetails: "instanceType" {
        "compute" => Compute(ComputeInstanceDetails),
    }
}

/// A template for launching instances, used directly or by instance pools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConfiguration {
    pub id: String,
    pub compartment_id: String,
    pub time_created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_details: Option<InstanceConfigurationInstanceDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deferred_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConfigurationSummary {
    pub id: String,
    pub compartment_id: String,
    pub time_created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstanceConfigurationDetails {
    pub compartment_id: String,
    pub instance_details: InstanceConfigurationInstanceDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}
