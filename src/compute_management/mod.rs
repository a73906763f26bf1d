//! Compute-management service facade: instance configurations and instance pools.

mod requests;

pub use requests::*;

use crate::client::{BaseClient, Operation, RequestSigner, ServiceEndpoint};
use crate::config::ConfigurationProvider;
use crate::models::{
    Instance, InstanceConfiguration, InstanceConfigurationSummary, InstancePool,
    InstancePoolSummary,
};
use crate::response::{Json, NoBody};
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

/// Client for the compute-management service.
#[derive(Clone)]
pub struct ComputeManagementClient {
    base: BaseClient,
}

impl ComputeManagementClient {
    pub fn new(config: impl ConfigurationProvider + 'static) -> Result<Self> {
        Self::with_provider(Arc::new(config))
    }

    pub fn with_provider(config: Arc<dyn ConfigurationProvider>) -> Result<Self> {
        Ok(Self {
            base: BaseClient::new(config, SERVICE)?,
        })
    }

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

    pub async fn create_instance_configuration(
        &self,
        cancel: &CancellationToken,
        mut request: CreateInstanceConfigurationRequest,
    ) -> Result<CreateInstanceConfigurationResponse> {
        request.ensure_retry_token();
        let operation = Operation::new(
            "CreateInstanceConfiguration",
            Method::POST,
            "/instanceConfigurations",
        );
        self.base
            .call::<_, _, Json<InstanceConfiguration>>(cancel, operation, &request)
            .await
    }

    pub async fn get_instance_configuration(
        &self,
        cancel: &CancellationToken,
        request: GetInstanceConfigurationRequest,
    ) -> Result<GetInstanceConfigurationResponse> {
        let operation = Operation::new(
            "GetInstanceConfiguration",
            Method::GET,
            "/instanceConfigurations/{instanceConfigurationId}",
        );
        self.base
            .call::<_, _, Json<InstanceConfiguration>>(cancel, operation, &request)
            .await
    }

    pub async fn list_instance_configurations(
        &self,
        cancel: &CancellationToken,
        request: ListInstanceConfigurationsRequest,
    ) -> Result<ListInstanceConfigurationsResponse> {
        let operation = Operation::new(
            "ListInstanceConfigurations",
            Method::GET,
            "/instanceConfigurations",
        );
        self.base
            .call::<_, _, Json<Vec<InstanceConfigurationSummary>>>(cancel, operation, &request)
            .await
    }

    pub async fn delete_instance_configuration(
        &self,
        cancel: &CancellationToken,
        request: DeleteInstanceConfigurationRequest,
    ) -> Result<DeleteInstanceConfigurationResponse> {
        let operation = Operation::new(
            "DeleteInstanceConfiguration",
            Method::DELETE,
            "/instanceConfigurations/{instanceConfigurationId}",
        );
        self.base.call::<_, _, NoBody>(cancel, operation, &request).await
    }

    /// Launches a single instance from a configuration. The request body is the
    /// polymorphic instance details; the response is the launched instance.
    pub async fn launch_instance_configuration(
        &self,
        cancel: &CancellationToken,
        mut request: LaunchInstanceConfigurationRequest,
    ) -> Result<LaunchInstanceConfigurationResponse> {
        request.ensure_retry_token();
        let operation = Operation::new(
            "LaunchInstanceConfiguration",
            Method::POST,
            "/instanceConfigurations/{instanceConfigurationId}/actions/launch",
        );
        self.base.call::<_, _, Json<Instance>>(cancel, operation, &request).await
    }

    pub async fn create_instance_pool(
        &self,
        cancel: &CancellationToken,
        mut request: CreateInstancePoolRequest,
    ) -> Result<CreateInstancePoolResponse> {
        request.ensure_retry_token();
        let operation = Operation::new("CreateInstancePool", Method::POST, "/instancePools");
        self.base
            .call::<_, _, Json<InstancePool>>(cancel, operation, &request)
            .await
    }

    pub async fn get_instance_pool(
        &self,
        cancel: &CancellationToken,
        request: GetInstancePoolRequest,
    ) -> Result<InstancePoolResponse> {
        let operation = Operation::new(
            "GetInstancePool",
            Method::GET,
            "/instancePools/{instancePoolId}",
        );
        self.base
            .call::<_, _, Json<InstancePool>>(cancel, operation, &request)
            .await
    }

    pub async fn list_instance_pools(
        &self,
        cancel: &CancellationToken,
        request: ListInstancePoolsRequest,
    ) -> Result<ListInstancePoolsResponse> {
        let operation = Operation::new("ListInstancePools", Method::GET, "/instancePools");
        self.base
            .call::<_, _, Json<Vec<InstancePoolSummary>>>(cancel, operation, &request)
            .await
    }

    pub async fn start_instance_pool(
        &self,
        cancel: &CancellationToken,
        mut request: StartInstancePoolRequest,
    ) -> Result<InstancePoolResponse> {
        request.ensure_retry_token();
        self.pool_action(
            "StartInstancePool",
            "/instancePools/{instancePoolId}/actions/start",
            cancel,
            &request,
        )
        .await
    }

    pub async fn stop_instance_pool(
        &self,
        cancel: &CancellationToken,
        mut request: StopInstancePoolRequest,
    ) -> Result<InstancePoolResponse> {
        request.ensure_retry_token();
        self.pool_action(
            "StopInstancePool",
            "/instancePools/{instancePoolId}/actions/stop",
            cancel,
            &request,
        )
        .await
    }

    pub async fn reset_instance_pool(
        &self,
        cancel: &CancellationToken,
        mut request: ResetInstancePoolRequest,
    ) -> Result<InstancePoolResponse> {
        request.ensure_retry_token();
        self.pool_action(
            "ResetInstancePool",
            "/instancePools/{instancePoolId}/actions/reset",
            cancel,
            &request,
        )
        .await
    }

    pub async fn softreset_instance_pool(
        &self,
        cancel: &CancellationToken,
        mut request: SoftresetInstancePoolRequest,
    ) -> Result<InstancePoolResponse> {
        request.ensure_retry_token();
        self.pool_action(
            "SoftresetInstancePool",
            "/instancePools/{instancePoolId}/actions/softreset",
            cancel,
            &request,
        )
        .await
    }

    pub async fn terminate_instance_pool(
        &self,
        cancel: &CancellationToken,
        request: TerminateInstancePoolRequest,
    ) -> Result<TerminateInstancePoolResponse> {
        let operation = Operation::new(
            "TerminateInstancePool",
            Method::DELETE,
            "/instancePools/{instancePoolId}",
        );
        self.base.call::<_, _, NoBody>(cancel, operation, &request).await
    }

    async fn pool_action<R: IdempotentRequest>(
        &self,
        name: &'static str,
        path: &'static str,
        cancel: &CancellationToken,
        request: &R,
    ) -> Result<InstancePoolResponse> {
        let operation = Operation::new(name, Method::POST, path);
        self.base
            .call::<_, _, Json<InstancePool>>(cancel, operation, request)
            .await
    }
}
