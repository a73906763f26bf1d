use super::{DefinedTags, FreeformTags};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

string_enum! {
    pub enum InstancePoolLifecycleState {
        Provisioning = "PROVISIONING",
        Scaling = "SCALING",
        Starting = "STARTING",
        Stopping = "STOPPING",
        Terminating = "TERMINATING",
        Stopped = "STOPPED",
        Terminated = "TERMINATED",
        Running = "RUNNING",
    }
}

/// Where a pool places its instances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancePoolPlacementConfiguration {
    pub availability_domain: String,
    pub primary_subnet_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault_domains: Option<Vec<String>>,
}

/// A group of instances launched from one configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancePool {
    pub id: String,
    pub compartment_id: String,
    pub instance_configuration_id: String,
    pub lifecycle_state: InstancePoolLifecycleState,
    pub placement_configurations: Vec<InstancePoolPlacementConfiguration>,
    pub size: i32,
    pub time_created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancePoolSummary {
    pub id: String,
    pub compartment_id: String,
    pub instance_configuration_id: String,
    pub lifecycle_state: InstancePoolLifecycleState,
    pub availability_domains: Vec<String>,
    pub size: i32,
    pub time_created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstancePoolDetails {
    pub compartment_id: String,
    pub instance_configuration_id: String,
    pub placement_configurations: Vec<InstancePoolPlacementConfiguration>,
    pub size: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}
