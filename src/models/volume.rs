use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSourceFromVolumeDetails {
    /// The id of the source volume.
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSourceFromVolumeBackupDetails {
    /// The id of the volume backup.
    pub id: String,
}

tagged_union! {
    /// What a new block volume is cloned or restored from.
    pub enum VolumeSourceDetails: "type" {
        "volume" => Volume(VolumeSourceFromVolumeDetails),
        "volumeBackup" => VolumeBackup(VolumeSourceFromVolumeBackupDetails),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootVolumeSourceFromBootVolumeDetails {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootVolumeSourceFromBootVolumeBackupDetails {
    pub id: String,
}

tagged_union! {
    /// What a new boot volume is cloned or restored from.
    pub enum BootVolumeSourceDetails: "type" {
        "bootVolume" => BootVolume(BootVolumeSourceFromBootVolumeDetails),
        "bootVolumeBackup" => BootVolumeBackup(BootVolumeSourceFromBootVolumeBackupDetails),
    }
}
