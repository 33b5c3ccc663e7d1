//! Machine CRD
//!
//! The generic `machine.openshift.io/v1beta1` Machine record that carries the
//! GCP provider payloads. Only the fields needed to embed the payloads are
//! modelled; the provider spec and status travel as raw objects.

use crate::codec::{from_raw_extension, to_raw_extension};
use crate::error::Result;
use crate::serde_helpers::preserve_unknown_fields;
use crate::{GcpMachineProviderSpec, GcpMachineProviderStatus};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Desired state of a Machine
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "machine.openshift.io",
    version = "v1beta1",
    kind = "Machine",
    namespaced,
    status = "MachineStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct MachineSpec {
    /// Provider-specific configuration used to create the machine
    #[serde(default)]
    pub provider_spec: ProviderSpec,

    /// Cloud provider ID of the instance, set once it exists
    #[serde(default, rename = "providerID", skip_serializing_if = "Option::is_none")]
    #[schemars(rename = "providerID")]
    pub provider_id: Option<String>,
}

/// Slot holding the raw provider spec object
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSpec {
    /// Inlined provider spec (e.g., a GCPMachineProviderSpec)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "preserve_unknown_fields")]
    pub value: Option<serde_json::Value>,
}

/// Observed state of a Machine
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MachineStatus {
    /// Machine lifecycle phase (Provisioning, Provisioned, Running, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,

    /// Inlined provider status (e.g., a GCPMachineProviderStatus)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "preserve_unknown_fields")]
    pub provider_status: Option<serde_json::Value>,
}

impl Machine {
    /// Decode the embedded GCP provider spec, if any
    pub fn gcp_provider_spec(&self) -> Result<Option<GcpMachineProviderSpec>> {
        self.spec
            .provider_spec
            .value
            .as_ref()
            .map(from_raw_extension::<GcpMachineProviderSpec>)
            .transpose()
    }

    /// Encode `spec` into `spec.providerSpec.value`
    pub fn set_gcp_provider_spec(&mut self, spec: &GcpMachineProviderSpec) -> Result<()> {
        self.spec.provider_spec.value = Some(to_raw_extension(spec)?);
        debug!(
            machine = self.metadata.name.as_deref().unwrap_or_default(),
            machine_type = %spec.machine_type,
            zone = %spec.zone,
            "Stored GCP provider spec"
        );
        Ok(())
    }

    /// Decode the embedded GCP provider status, if any
    pub fn gcp_provider_status(&self) -> Result<Option<GcpMachineProviderStatus>> {
        self.status
            .as_ref()
            .and_then(|status| status.provider_status.as_ref())
            .map(from_raw_extension::<GcpMachineProviderStatus>)
            .transpose()
    }

    /// Encode `provider_status` into `status.providerStatus`
    pub fn set_gcp_provider_status(&mut self, provider_status: &GcpMachineProviderStatus) -> Result<()> {
        let value = to_raw_extension(provider_status)?;
        self.status
            .get_or_insert_with(MachineStatus::default)
            .provider_status = Some(value);
        debug!(
            machine = self.metadata.name.as_deref().unwrap_or_default(),
            conditions = provider_status.conditions.len(),
            "Stored GCP provider status"
        );
        Ok(())
    }
}
