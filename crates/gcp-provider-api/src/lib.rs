//! GCP Machine Provider API
//!
//! Types for the GCP-specific payloads embedded in `machine.openshift.io/v1beta1`
//! Machines:
//! - `GcpMachineProviderSpec`: desired VM configuration (`spec.providerSpec.value`)
//! - `GcpMachineProviderStatus`: observed instance state (`status.providerStatus`)
//!
//! The types carry no validation. Consumers (the GCP actuator) decide whether a
//! decoded spec is usable.

pub mod codec;
pub mod error;
pub mod machine;
pub mod provider_spec;
pub mod provider_status;
mod serde_helpers;

pub use codec::*;
pub use error::{ProviderApiError, Result};
pub use machine::*;
pub use provider_spec::*;
pub use provider_status::*;

/// API group/version shared by every provider payload.
pub const API_VERSION: &str = "machine.openshift.io/v1beta1";

/// Kind written into the envelope of a `GcpMachineProviderSpec`.
pub const PROVIDER_SPEC_KIND: &str = "GCPMachineProviderSpec";

/// Kind written into the envelope of a `GcpMachineProviderStatus`.
pub const PROVIDER_STATUS_KIND: &str = "GCPMachineProviderStatus";
