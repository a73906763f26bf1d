//! Compute service facade: instances, images and volume attachments.
//!
//! # Examples
//!
//! ```no_run
//! use coreservices::compute::{ComputeClient, GetInstanceRequest};
//! use coreservices::{CancellationToken, StaticConfigurationProvider};
//!
//! # async fn example() -> Result<(), coreservices::Error> {
//! let client = ComputeClient::new(StaticConfigurationProvider::from_env()?)?;
//! let response = client
//!     .get_instance(
//!         &CancellationToken::new(),
//!         GetInstanceRequest {
//!             instance_id: "ocid1.instance.oc1..example".to_string(),
//!             ..Default::default()
//!         },
//!     )
//!     .await?;
//! println!("{:?}", response.instance.map(|i| i.lifecycle_state));
//! # Ok(())
//! # }
//! ```

mod requests;

pub use requests::*;

use crate::client::{BaseClient, Operation, RequestSigner, ServiceEndpoint};
use crate::config::ConfigurationProvider;
use crate::models::{Image, Instance, VolumeAttachment};
use crate::response::{Json, NoBody, PlainText, Union, UnionList};
use crate::schema::IdempotentRequest;
use crate::Result;
use http::Method;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

const SERVICE: ServiceEndpoint = ServiceEndpoint {
    template: "https://iaas.{region}.{secondLevelDomain}",
    base_path: "20160918",
};

/// Client for the compute service. Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ComputeClient {
    base: BaseClient,
}

impl ComputeClient {
    /// Builds a client whose host is derived from the provider's region.
    pub fn new(config: impl ConfigurationProvider + 'static) -> Result<Self> {
        Self::with_provider(Arc::new(config))
    }

    pub fn with_provider(config: Arc<dyn ConfigurationProvider>) -> Result<Self> {
        Ok(Self {
            base: BaseClient::new(config, SERVICE)?,
        })
    }

    /// Points the client at the endpoint of another region.
    pub fn set_region(&mut self, region: &str) -> Result<()> {
        self.base.set_region(region)
    }

    pub fn set_host(&mut self, host: &str) -> Result<()> {
        self.base.set_host(host)
    }

    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.base.set_signer(signer);
        self
    }

    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.base.set_http_client(http_client);
        self
    }

    pub fn host(&self) -> &Url {
        self.base.host()
    }

    pub fn base_client(&self) -> &BaseClient {
        &self.base
    }

    /// Attaches a volume. The response body resolves to the attachment's concrete type.
    pub async fn attach_volume(
        &self,
        cancel: &CancellationToken,
        mut request: AttachVolumeRequest,
    ) -> Result<AttachVolumeResponse> {
        request.ensure_retry_token();
        let operation = Operation::new("AttachVolume", Method::POST, "/volumeAttachments/");
        self.base
            .call::<_, _, Union<VolumeAttachment>>(cancel, operation, &request)
            .await
    }

    pub async fn get_volume_attachment(
        &self,
        cancel: &CancellationToken,
        request: GetVolumeAttachmentRequest,
    ) -> Result<GetVolumeAttachmentResponse> {
        let operation = Operation::new(
            "GetVolumeAttachment",
            Method::GET,
            "/volumeAttachments/{volumeAttachmentId}",
        );
        self.base
            .call::<_, _, Union<VolumeAttachment>>(cancel, operation, &request)
            .await
    }

    pub async fn list_volume_attachments(
        &self,
        cancel: &CancellationToken,
        request: ListVolumeAttachmentsRequest,
    ) -> Result<ListVolumeAttachmentsResponse> {
        let operation = Operation::new("ListVolumeAttachments", Method::GET, "/volumeAttachments/");
        self.base
            .call::<_, _, UnionList<VolumeAttachment>>(cancel, operation, &request)
            .await
    }

    pub async fn detach_volume(
        &self,
        cancel: &CancellationToken,
        request: DetachVolumeRequest,
    ) -> Result<DetachVolumeResponse> {
        let operation = Operation::new(
            "DetachVolume",
            Method::DELETE,
            "/volumeAttachments/{volumeAttachmentId}",
        );
        self.base.call::<_, _, NoBody>(cancel, operation, &request).await
    }

    pub async fn launch_instance(
        &self,
        cancel: &CancellationToken,
        mut request: LaunchInstanceRequest,
    ) -> Result<LaunchInstanceResponse> {
        request.ensure_retry_token();
        let operation = Operation::new("LaunchInstance", Method::POST, "/instances/");
        self.base.call::<_, _, Json<Instance>>(cancel, operation, &request).await
    }

    pub async fn get_instance(
        &self,
        cancel: &CancellationToken,
        request: GetInstanceRequest,
    ) -> Result<GetInstanceResponse> {
        let operation = Operation::new("GetInstance", Method::GET, "/instances/{instanceId}");
        self.base.call::<_, _, Json<Instance>>(cancel, operation, &request).await
    }

    pub async fn list_instances(
        &self,
        cancel: &CancellationToken,
        request: ListInstancesRequest,
    ) -> Result<ListInstancesResponse> {
        let operation = Operation::new("ListInstances", Method::GET, "/instances/");
        self.base
            .call::<_, _, Json<Vec<Instance>>>(cancel, operation, &request)
            .await
    }

    pub async fn instance_action(
        &self,
        cancel: &CancellationToken,
        mut request: InstanceActionRequest,
    ) -> Result<InstanceActionResponse> {
        request.ensure_retry_token();
        let operation = Operation::new("InstanceAction", Method::POST, "/instances/{instanceId}");
        self.base.call::<_, _, Json<Instance>>(cancel, operation, &request).await
    }

    pub async fn terminate_instance(
        &self,
        cancel: &CancellationToken,
        request: TerminateInstanceRequest,
    ) -> Result<TerminateInstanceResponse> {
        let operation = Operation::new(
            "TerminateInstance",
            Method::DELETE,
            "/instances/{instanceId}",
        );
        self.base.call::<_, _, NoBody>(cancel, operation, &request).await
    }

    pub async fn create_image(
        &self,
        cancel: &CancellationToken,
        mut request: CreateImageRequest,
    ) -> Result<CreateImageResponse> {
        request.ensure_retry_token();
        let operation = Operation::new("CreateImage", Method::POST, "/images");
        self.base.call::<_, _, Json<Image>>(cancel, operation, &request).await
    }

    pub async fn get_image(
        &self,
        cancel: &CancellationToken,
        request: GetImageRequest,
    ) -> Result<GetImageResponse> {
        let operation = Operation::new("GetImage", Method::GET, "/images/{imageId}");
        self.base.call::<_, _, Json<Image>>(cancel, operation, &request).await
    }

    pub async fn export_image(
        &self,
        cancel: &CancellationToken,
        mut request: ExportImageRequest,
    ) -> Result<ExportImageResponse> {
        request.ensure_retry_token();
        let operation = Operation::new(
            "ExportImage",
            Method::POST,
            "/images/{imageId}/actions/export",
        );
        self.base.call::<_, _, Json<Image>>(cancel, operation, &request).await
    }

    /// Reads console history bytes as text; `opc_bytes_remaining` says how much is left.
    pub async fn get_console_history_content(
        &self,
        cancel: &CancellationToken,
        request: GetConsoleHistoryContentRequest,
    ) -> Result<GetConsoleHistoryContentResponse> {
        let operation = Operation::new(
            "GetConsoleHistoryContent",
            Method::GET,
            "/instanceConsoleHistories/{instanceConsoleHistoryId}/data",
        );
        self.base.call::<_, _, PlainText>(cancel, operation, &request).await
    }
}
