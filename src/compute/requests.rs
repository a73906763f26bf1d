//! Request and response types of the compute service.

use crate::metadata::RequestMetadata;
use crate::models::{
    AttachVolumeDetails, CreateImageDetails, ExportImageDetails, Image, Instance,
    InstanceActionType, InstanceLifecycleState, LaunchInstanceDetails, SortBy, SortOrder,
    VolumeAttachment,
};
use crate::schema::{Field, IdempotentRequest, TaggedRequest};

/// Attaches a volume to an instance.
#[derive(Debug, Clone, Default)]
pub struct AttachVolumeRequest {
    pub attach_volume_details: Option<AttachVolumeDetails>,
    /// Filled with a fresh token before the first attempt when left empty.
    pub opc_retry_token: Option<String>,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for AttachVolumeRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::body("AttachVolumeDetails", &self.attach_volume_details)?.mandatory(),
            Field::header("opc-retry-token", &self.opc_retry_token),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

impl IdempotentRequest for AttachVolumeRequest {
    fn retry_token_mut(&mut self) -> &mut Option<String> {
        &mut self.opc_retry_token
    }
}

tagged_response! {
    pub struct AttachVolumeResponse {
        body volume_attachment: VolumeAttachment,
        header etag: Option<String> = "etag",
        header opc_request_id: Option<String> = "opc-request-id",
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetVolumeAttachmentRequest {
    pub volume_attachment_id: String,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for GetVolumeAttachmentRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::path("volumeAttachmentId", &self.volume_attachment_id),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

tagged_response! {
    pub struct GetVolumeAttachmentResponse {
        body volume_attachment: VolumeAttachment,
        header etag: Option<String> = "etag",
        header opc_request_id: Option<String> = "opc-request-id",
    }
}

/// Lists volume attachments in a compartment. Each element resolves to its own variant.
#[derive(Debug, Clone, Default)]
pub struct ListVolumeAttachmentsRequest {
    pub compartment_id: String,
    pub availability_domain: Option<String>,
    pub limit: Option<i32>,
    /// The `opc_next_page` value of the previous page.
    pub page: Option<String>,
    pub instance_id: Option<String>,
    pub volume_id: Option<String>,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for ListVolumeAttachmentsRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::query("compartmentId", &self.compartment_id).mandatory(),
            Field::query("availabilityDomain", &self.availability_domain),
            Field::query("limit", &self.limit),
            Field::query("page", &self.page).omit_empty(),
            Field::query("instanceId", &self.instance_id),
            Field::query("volumeId", &self.volume_id),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

tagged_response! {
    pub struct ListVolumeAttachmentsResponse {
        body items: Vec<VolumeAttachment>,
        /// Pass back as `page` to fetch the next page. Absent on the last page.
        header opc_next_page: Option<String> = "opc-next-page",
        header opc_request_id: Option<String> = "opc-request-id",
    }
}

#[derive(Debug, Clone, Default)]
pub struct DetachVolumeRequest {
    pub volume_attachment_id: String,
    pub if_match: Option<String>,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for DetachVolumeRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::path("volumeAttachmentId", &self.volume_attachment_id),
            Field::header("if-match", &self.if_match),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

tagged_response! {
    pub struct DetachVolumeResponse {
        header opc_request_id: Option<String> = "opc-request-id",
    }
}

#[derive(Debug, Clone, Default)]
pub struct LaunchInstanceRequest {
    pub launch_instance_details: Option<LaunchInstanceDetails>,
    pub opc_retry_token: Option<String>,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for LaunchInstanceRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::body("LaunchInstanceDetails", &self.launch_instance_details)?.mandatory(),
            Field::header("opc-retry-token", &self.opc_retry_token),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

impl IdempotentRequest for LaunchInstanceRequest {
    fn retry_token_mut(&mut self) -> &mut Option<String> {
        &mut self.opc_retry_token
    }
}

tagged_response! {
    pub struct LaunchInstanceResponse {
        body instance: Instance,
        header etag: Option<String> = "etag",
        header opc_request_id: Option<String> = "opc-request-id",
        header opc_work_request_id: Option<String> = "opc-work-request-id",
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetInstanceRequest {
    pub instance_id: String,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for GetInstanceRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::path("instanceId", &self.instance_id),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

tagged_response! {
    pub struct GetInstanceResponse {
        body instance: Instance,
        header etag: Option<String> = "etag",
        header opc_request_id: Option<String> = "opc-request-id",
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListInstancesRequest {
    pub compartment_id: String,
    pub availability_domain: Option<String>,
    pub display_name: Option<String>,
    pub limit: Option<i32>,
    pub page: Option<String>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub lifecycle_state: Option<InstanceLifecycleState>,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for ListInstancesRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::query("compartmentId", &self.compartment_id).mandatory(),
            Field::query("availabilityDomain", &self.availability_domain),
            Field::query("displayName", &self.display_name),
            Field::query("limit", &self.limit),
            Field::query("page", &self.page).omit_empty(),
            Field::query("sortBy", &self.sort_by),
            Field::query("sortOrder", &self.sort_order),
            Field::query("lifecycleState", &self.lifecycle_state),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

tagged_response! {
    pub struct ListInstancesResponse {
        body items: Vec<Instance>,
        header opc_next_page: Option<String> = "opc-next-page",
        header opc_request_id: Option<String> = "opc-request-id",
    }
}

/// Performs a power action on an instance.
#[derive(Debug, Clone, Default)]
pub struct InstanceActionRequest {
    pub instance_id: String,
    pub action: Option<InstanceActionType>,
    pub if_match: Option<String>,
    pub opc_retry_token: Option<String>,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for InstanceActionRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::path("instanceId", &self.instance_id),
            Field::query("action", &self.action).mandatory(),
            Field::header("if-match", &self.if_match),
            Field::header("opc-retry-token", &self.opc_retry_token),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

impl IdempotentRequest for InstanceActionRequest {
    fn retry_token_mut(&mut self) -> &mut Option<String> {
        &mut self.opc_retry_token
    }
}

tagged_response! {
    pub struct InstanceActionResponse {
        body instance: Instance,
        header etag: Option<String> = "etag",
        header opc_request_id: Option<String> = "opc-request-id",
    }
}

#[derive(Debug, Clone, Default)]
pub struct TerminateInstanceRequest {
    pub instance_id: String,
    pub if_match: Option<String>,
    /// Keep the boot volume after the instance is gone. The service default is `false`.
    pub preserve_boot_volume: Option<bool>,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for TerminateInstanceRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::path("instanceId", &self.instance_id),
            Field::query("preserveBootVolume", &self.preserve_boot_volume),
            Field::header("if-match", &self.if_match),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

tagged_response! {
    pub struct TerminateInstanceResponse {
        header opc_request_id: Option<String> = "opc-request-id",
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateImageRequest {
    pub create_image_details: Option<CreateImageDetails>,
    pub opc_retry_token: Option<String>,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for CreateImageRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::body("CreateImageDetails", &self.create_image_details)?.mandatory(),
            Field::header("opc-retry-token", &self.opc_retry_token),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

impl IdempotentRequest for CreateImageRequest {
    fn retry_token_mut(&mut self) -> &mut Option<String> {
        &mut self.opc_retry_token
    }
}

tagged_response! {
    pub struct CreateImageResponse {
        body image: Image,
        header etag: Option<String> = "etag",
        header opc_request_id: Option<String> = "opc-request-id",
        header opc_work_request_id: Option<String> = "opc-work-request-id",
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetImageRequest {
    pub image_id: String,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for GetImageRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::path("imageId", &self.image_id),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

tagged_response! {
    pub struct GetImageResponse {
        body image: Image,
        header etag: Option<String> = "etag",
        header opc_request_id: Option<String> = "opc-request-id",
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportImageRequest {
    pub image_id: String,
    pub export_image_details: Option<ExportImageDetails>,
    pub if_match: Option<String>,
    pub opc_retry_token: Option<String>,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for ExportImageRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::path("imageId", &self.image_id),
            Field::body("ExportImageDetails", &self.export_image_details)?.mandatory(),
            Field::header("if-match", &self.if_match),
            Field::header("opc-retry-token", &self.opc_retry_token),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

impl IdempotentRequest for ExportImageRequest {
    fn retry_token_mut(&mut self) -> &mut Option<String> {
        &mut self.opc_retry_token
    }
}

tagged_response! {
    pub struct ExportImageResponse {
        body image: Image,
        header etag: Option<String> = "etag",
        header opc_request_id: Option<String> = "opc-request-id",
        header opc_work_request_id: Option<String> = "opc-work-request-id",
    }
}

/// Reads a window of a captured serial console history.
#[derive(Debug, Clone, Default)]
pub struct GetConsoleHistoryContentRequest {
    pub instance_console_history_id: String,
    /// Byte offset to start reading from.
    pub offset: Option<i32>,
    /// Maximum number of bytes to return.
    pub length: Option<i32>,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for GetConsoleHistoryContentRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::path("instanceConsoleHistoryId", &self.instance_console_history_id),
            Field::query("offset", &self.offset),
            Field::query("length", &self.length),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

tagged_response! {
    pub struct GetConsoleHistoryContentResponse {
        body value: String,
        header opc_bytes_remaining: Option<i64> = "opc-bytes-remaining",
        header opc_request_id: Option<String> = "opc-request-id",
    }
}
