//! Payload records of the compute and compute-management APIs.
//!
//! Records use camelCase on the wire; optional fields are skipped when absent.
//! Discriminated unions are declared with `tagged_union!` and enum value sets with
//! `string_enum!`.

mod dhcp;
mod image;
mod instance;
mod instance_configuration;
mod instance_pool;
mod volume;
mod volume_attachment;

pub use dhcp::*;
pub use image::*;
pub use instance::*;
pub use instance_configuration::*;
pub use instance_pool::*;
pub use volume::*;
pub use volume_attachment::*;

string_enum! {
    /// Direction of a list sort.
    pub enum SortOrder {
        Asc = "ASC",
        Desc = "DESC",
    }
}

string_enum! {
    /// Field a list is sorted by. Display names sort case-sensitively.
    pub enum SortBy {
        TimeCreated = "TIMECREATED",
        DisplayName = "DISPLAYNAME",
    }
}

/// Free-form key/value tags attached to most resources.
pub type FreeformTags = std::collections::HashMap<String, String>;

/// Namespaced key/value tags.
pub type DefinedTags =
    std::collections::HashMap<String, std::collections::HashMap<String, serde_json::Value>>;
