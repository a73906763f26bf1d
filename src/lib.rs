//! # Coreservices - typed client for the compute control-plane API
//!
//! Coreservices turns typed operation requests into HTTP calls against the compute and
//! compute-management services and decodes the replies into typed responses. Requests
//! are described field by field (path, query, header or body), composed into a single
//! HTTP request, sent under an explicit retry policy and decomposed back, with
//! discriminated-union payloads resolved to their concrete variant.
//!
//! ## Quick Start
//!
//! ```no_run
//! use coreservices::compute::{AttachVolumeRequest, ComputeClient};
//! use coreservices::models::{AttachIScsiVolumeDetails, AttachVolumeBase, VolumeAttachment};
//! use coreservices::{
//!     CancellationToken, RequestMetadata, RetryPolicy, StaticConfigurationProvider,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), coreservices::Error> {
//!     let config = StaticConfigurationProvider::builder()
//!         .region("us-phoenix-1")
//!         .tenancy_id("ocid1.tenancy.oc1..example")
//!         .user_id("ocid1.user.oc1..example")
//!         .key_fingerprint("20:3b:97:13:55:1c")
//!         .build()?;
//!     let client = ComputeClient::new(config)?;
//!
//!     let request = AttachVolumeRequest {
//!         attach_volume_details: Some(
//!             AttachIScsiVolumeDetails {
//!                 base: AttachVolumeBase {
//!                     instance_id: "ocid1.instance.oc1..example".to_string(),
//!                     volume_id: "ocid1.volume.oc1..example".to_string(),
//!                     ..Default::default()
//!                 },
//!                 use_chap: Some(true),
//!             }
//!             .into(),
//!         ),
//!         metadata: RequestMetadata::default().with_retry_policy(RetryPolicy::default()),
//!         ..Default::default()
//!     };
//!
//!     let response = client.attach_volume(&CancellationToken::new(), request).await?;
//!     match response.volume_attachment {
//!         Some(VolumeAttachment::IScsi(attachment)) => println!("iqn: {:?}", attachment.iqn),
//!         Some(other) => println!("attached as {:?}", other),
//!         None => println!("empty body"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Typed operations** - one request and one response type per operation, with
//!   mandatory fields checked before anything is sent
//! - **Tagged unions** - payloads such as volume attachments decode to the variant
//!   named by their discriminator; unknown variants keep their raw JSON
//! - **Explicit retries** - a [`RetryPolicy`] on the request's [`RequestMetadata`]
//!   controls attempts, backoff, deadline and which errors are retried
//! - **Idempotency tokens** - mutating operations send the same `opc-retry-token`
//!   on every attempt
//! - **Cancellation** - every call takes a [`CancellationToken`] that interrupts
//!   sends and backoff sleeps
//! - **Logging** - structured `tracing` events per attempt and per response
//!
//! ## Error Handling
//!
//! Every failure is an [`Error`]; service errors keep the raw response and the
//! request id the service assigned:
//!
//! ```no_run
//! use coreservices::compute::{ComputeClient, GetInstanceRequest};
//! use coreservices::{CancellationToken, Error};
//!
//! # async fn example(client: ComputeClient) {
//! let request = GetInstanceRequest {
//!     instance_id: "ocid1.instance.oc1..example".to_string(),
//!     ..Default::default()
//! };
//! match client.get_instance(&CancellationToken::new(), request).await {
//!     Ok(response) => println!("{:?}", response.instance),
//!     Err(Error::Service(e)) => {
//!         eprintln!("{} {}: {} (request {:?})", e.status, e.code, e.message, e.opc_request_id);
//!     }
//!     Err(e) => eprintln!("call failed: {}", e),
//! }
//! # }
//! ```

#[macro_use]
mod macros;

pub mod client;
pub mod compose;
pub mod compute;
pub mod compute_management;
pub mod config;
mod error;
pub mod metadata;
pub mod models;
pub mod polymorphic;
pub mod region;
pub mod response;
pub mod retry;
pub mod schema;

pub use client::{BaseClient, RequestSigner};
pub use config::{ConfigurationProvider, StaticConfigurationProvider};
pub use error::{Error, Result, ServiceError};
pub use metadata::RequestMetadata;
pub use response::RawResponse;
pub use retry::{Backoff, RetryPolicy, RetryPredicate};
pub use tokio_util::sync::CancellationToken;
