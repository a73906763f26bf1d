//! Per-call options shared by every request type.

use crate::retry::RetryPolicy;

/// Options that travel with a request but never reach the wire.
///
/// Every request type embeds one of these as its `metadata` field.
///
/// # Examples
///
/// ```
/// use coreservices::compute::GetInstanceRequest;
/// use coreservices::{RequestMetadata, RetryPolicy};
///
/// let request = GetInstanceRequest {
///     instance_id: "ocid1.instance.oc1..example".to_string(),
///     metadata: RequestMetadata::default().with_retry_policy(RetryPolicy::default()),
///     ..Default::default()
/// };
/// assert!(request.metadata.retry_policy().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestMetadata {
    /// The retry policy for this call. `None` means a single attempt.
    pub retry_policy: Option<RetryPolicy>,
}

impl RequestMetadata {
    /// Sets the retry policy for this call.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// The caller-supplied retry policy, if any.
    pub fn retry_policy(&self) -> Option<&RetryPolicy> {
        self.retry_policy.as_ref()
    }
}
