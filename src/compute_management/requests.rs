//! Request and response types of the compute-management service.

use crate::metadata::RequestMetadata;
use crate::models::{
    CreateInstanceConfigurationDetails, CreateInstancePoolDetails, Instance, InstanceConfiguration,
    InstanceConfigurationInstanceDetails, InstanceConfigurationSummary, InstancePool,
    InstancePoolLifecycleState, InstancePoolSummary, SortBy, SortOrder,
};
use crate::schema::{Field, IdempotentRequest, TaggedRequest};

#[derive(Debug, Clone, Default)]
pub struct CreateInstanceConfigurationRequest {
    pub create_instance_configuration: Option<CreateInstanceConfigurationDetails>,
    pub opc_retry_token: Option<String>,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for CreateInstanceConfigurationRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::body(
                "CreateInstanceConfiguration",
                &self.create_instance_configuration,
            )?
            .mandatory(),
            Field::header("opc-retry-token", &self.opc_retry_token),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

impl IdempotentRequest for CreateInstanceConfigurationRequest {
    fn retry_token_mut(&mut self) -> &mut Option<String> {
        &mut self.opc_retry_token
    }
}

tagged_response! {
    pub struct CreateInstanceConfigurationResponse {
        body instance_configuration: InstanceConfiguration,
        header etag: Option<String> = "etag",
        header opc_request_id: Option<String> = "opc-request-id",
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetInstanceConfigurationRequest {
    pub instance_configuration_id: String,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for GetInstanceConfigurationRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::path("instanceConfigurationId", &self.instance_configuration_id),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

tagged_response! {
    pub struct GetInstanceConfigurationResponse {
        body instance_configuration: InstanceConfiguration,
        header etag: Option<String> = "etag",
        header opc_request_id: Option<String> = "opc-request-id",
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListInstanceConfigurationsRequest {
    pub compartment_id: String,
    pub limit: Option<i32>,
    pub page: Option<String>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for ListInstanceConfigurationsRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::query("compartmentId", &self.compartment_id).mandatory(),
            Field::query("limit", &self.limit),
            Field::query("page", &self.page).omit_empty(),
            Field::query("sortBy", &self.sort_by),
            Field::query("sortOrder", &self.sort_order),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

tagged_response! {
    pub struct ListInstanceConfigurationsResponse {
        body items: Vec<InstanceConfigurationSummary>,
        header opc_next_page: Option<String> = "opc-next-page",
        header opc_request_id: Option<String> = "opc-request-id",
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeleteInstanceConfigurationRequest {
    pub instance_configuration_id: String,
    pub if_match: Option<String>,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for DeleteInstanceConfigurationRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::path("instanceConfigurationId", &self.instance_configuration_id),
            Field::header("if-match", &self.if_match),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

tagged_response! {
    pub struct DeleteInstanceConfigurationResponse {
        header opc_request_id: Option<String> = "opc-request-id",
    }
}

/// Launches one instance from a configuration, optionally overriding its details.
#[derive(Debug, Clone, Default)]
pub struct LaunchInstanceConfigurationRequest {
    pub instance_configuration_id: String,
    pub instance_configuration: Option<InstanceConfigurationInstanceDetails>,
    pub opc_retry_token: Option<String>,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for LaunchInstanceConfigurationRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::path("instanceConfigurationId", &self.instance_configuration_id),
            Field::body("InstanceConfiguration", &self.instance_configuration)?.mandatory(),
            Field::header("opc-retry-token", &self.opc_retry_token),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

impl IdempotentRequest for LaunchInstanceConfigurationRequest {
    fn retry_token_mut(&mut self) -> &mut Option<String> {
        &mut self.opc_retry_token
    }
}

tagged_response! {
    pub struct LaunchInstanceConfigurationResponse {
        body instance: Instance,
        header opc_request_id: Option<String> = "opc-request-id",
        header opc_work_request_id: Option<String> = "opc-work-request-id",
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateInstancePoolRequest {
    pub create_instance_pool_details: Option<CreateInstancePoolDetails>,
    pub opc_retry_token: Option<String>,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for CreateInstancePoolRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::body("CreateInstancePoolDetails", &self.create_instance_pool_details)?
                .mandatory(),
            Field::header("opc-retry-token", &self.opc_retry_token),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

impl IdempotentRequest for CreateInstancePoolRequest {
    fn retry_token_mut(&mut self) -> &mut Option<String> {
        &mut self.opc_retry_token
    }
}

tagged_response! {
    pub struct CreateInstancePoolResponse {
        body instance_pool: InstancePool,
        header etag: Option<String> = "etag",
        header opc_request_id: Option<String> = "opc-request-id",
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetInstancePoolRequest {
    pub instance_pool_id: String,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for GetInstancePoolRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::path("instancePoolId", &self.instance_pool_id),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListInstancePoolsRequest {
    pub compartment_id: String,
    pub display_name: Option<String>,
    pub limit: Option<i32>,
    pub page: Option<String>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub lifecycle_state: Option<InstancePoolLifecycleState>,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for ListInstancePoolsRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::query("compartmentId", &self.compartment_id).mandatory(),
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
    pub struct ListInstancePoolsResponse {
        body items: Vec<InstancePoolSummary>,
        header opc_next_page: Option<String> = "opc-next-page",
        header opc_request_id: Option<String> = "opc-request-id",
    }
}

#[derive(Debug, Clone, Default)]
pub struct TerminateInstancePoolRequest {
    pub instance_pool_id: String,
    pub if_match: Option<String>,
    pub opc_request_id: Option<String>,
    pub metadata: RequestMetadata,
}

impl TaggedRequest for TerminateInstancePoolRequest {
    fn fields(&self) -> serde_json::Result<Vec<Field>> {
        Ok(vec![
            Field::path("instancePoolId", &self.instance_pool_id),
            Field::header("if-match", &self.if_match),
            Field::header("opc-request-id", &self.opc_request_id),
        ])
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

tagged_response! {
    pub struct TerminateInstancePoolResponse {
        header opc_request_id: Option<String> = "opc-request-id",
    }
}

/// Every pool action takes the same parameters and returns the pool.
macro_rules! pool_action_request {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            pub instance_pool_id: String,
            pub if_match: Option<String>,
            pub opc_retry_token: Option<String>,
            pub opc_request_id: Option<String>,
            pub metadata: RequestMetadata,
        }

        impl TaggedRequest for $name {
            fn fields(&self) -> serde_json::Result<Vec<Field>> {
                Ok(vec![
                    Field::path("instancePoolId", &self.instance_pool_id),
                    Field::header("if-match", &self.if_match),
                    Field::header("opc-retry-token", &self.opc_retry_token),
                    Field::header("opc-request-id", &self.opc_request_id),
                ])
            }

            fn metadata(&self) -> &RequestMetadata {
                &self.metadata
            }
        }

        impl IdempotentRequest for $name {
            fn retry_token_mut(&mut self) -> &mut Option<String> {
                &mut self.opc_retry_token
            }
        }
    };
}

pool_action_request!(
    /// Starts every stopped instance of a pool.
    StartInstancePoolRequest
);
pool_action_request!(
    /// Stops every running instance of a pool.
    StopInstancePoolRequest
);
pool_action_request!(
    /// Hard-resets every instance of a pool.
    ResetInstancePoolRequest
);
pool_action_request!(
    /// Sends an ACPI shutdown to every instance of a pool, then powers it back on.
    SoftresetInstancePoolRequest
);

tagged_response! {
    /// The response of `GetInstancePool` and of every pool action.
    pub struct InstancePoolResponse {
        body instance_pool: InstancePool,
        header etag: Option<String> = "etag",
        header opc_request_id: Option<String> = "opc-request-id",
    }
}
