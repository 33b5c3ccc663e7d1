//! GCPMachineProviderStatus
//!
//! Observed state of a GCP instance, embedded in `Machine.status.providerStatus`
//! and written by the GCP actuator after each reconciliation attempt.

use crate::serde_helpers::null_as_default;
use crate::{API_VERSION, PROVIDER_STATUS_KIND};
use chrono::{DateTime, Utc};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Reason set on `MachineCreated` when the instance was created
pub const MACHINE_CREATION_SUCCEEDED_REASON: &str = "MachineCreationSucceeded";

/// Reason set on `MachineCreated` when instance creation failed
pub const MACHINE_CREATION_FAILED_REASON: &str = "MachineCreationFailed";

/// GcpMachineProviderStatus reports GCP-specific instance state
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GcpMachineProviderStatus {
    /// API version of the payload (machine.openshift.io/v1beta1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Kind of the payload (GCPMachineProviderStatus)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Standard object metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<BTreeMap<String, serde_json::Value>>")]
    pub metadata: Option<ObjectMeta>,

    /// ID of the instance in GCP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,

    /// Provisioning state of the instance (e.g., RUNNING, STOPPED)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_state: Option<String>,

    /// Conditions reported for the Machine, in insertion order
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub conditions: Vec<GcpMachineProviderCondition>,
}

impl GcpMachineProviderStatus {
    /// Create an empty status with the envelope set
    pub fn new() -> Self {
        Self {
            api_version: Some(API_VERSION.to_string()),
            kind: Some(PROVIDER_STATUS_KIND.to_string()),
            ..Default::default()
        }
    }

    /// Condition with the given type, if reported
    pub fn find_condition(&self, condition_type: &ConditionType) -> Option<&GcpMachineProviderCondition> {
        self.conditions
            .iter()
            .find(|condition| &condition.condition_type == condition_type)
    }

    /// Insert or update a condition, keyed by its type.
    ///
    /// New types are appended. For an existing type the probe time moves to
    /// `now`, the transition time moves to `now` only if the status changed,
    /// and reason/message are replaced.
    pub fn set_condition(&mut self, mut condition: GcpMachineProviderCondition, now: DateTime<Utc>) {
        match self
            .conditions
            .iter_mut()
            .find(|existing| existing.condition_type == condition.condition_type)
        {
            Some(existing) => {
                if existing.status != condition.status {
                    existing.status = condition.status;
                    existing.last_transition_time = Some(now);
                }
                existing.last_probe_time = Some(now);
                existing.reason = condition.reason;
                existing.message = condition.message;
            }
            None => {
                condition.last_probe_time = Some(now);
                if condition.last_transition_time.is_none() {
                    condition.last_transition_time = Some(now);
                }
                self.conditions.push(condition);
            }
        }
    }
}

/// A condition in a GcpMachineProviderStatus
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GcpMachineProviderCondition {
    /// Type of the condition
    #[serde(rename = "type")]
    #[schemars(rename = "type")]
    pub condition_type: ConditionType,

    /// Status of the condition (True, False, Unknown)
    pub status: ConditionStatus,

    /// Last time the condition was probed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_probe_time: Option<DateTime<Utc>>,

    /// Last time the condition transitioned from one status to another
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,

    /// One-word CamelCase reason for the last transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable details about the last transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GcpMachineProviderCondition {
    /// Condition probed and transitioned at `now`
    pub fn new(
        condition_type: ConditionType,
        status: ConditionStatus,
        reason: impl Into<String>,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            condition_type,
            status,
            last_probe_time: Some(now),
            last_transition_time: Some(now),
            reason: Some(reason.into()),
            message: Some(message.into()),
        }
    }
}

/// Condition type of a provider condition
///
/// Serialized as a bare string. Any string is accepted, so types this crate
/// has no constant for survive a decode/encode cycle unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ConditionType(Cow<'static, str>);

impl ConditionType {
    /// Historical name of `MACHINE_CREATED`
    pub const MACHINE_CREATION: ConditionType = ConditionType(Cow::Borrowed("MachineCreation"));

    /// Whether the instance has been created
    pub const MACHINE_CREATED: ConditionType = ConditionType(Cow::Borrowed("MachineCreated"));

    /// Condition type with the given name
    pub fn new(name: impl Into<String>) -> Self {
        ConditionType(Cow::Owned(name.into()))
    }

    /// Wire name of the condition type
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ConditionType {
    fn from(value: String) -> Self {
        ConditionType::new(value)
    }
}

impl From<&str> for ConditionType {
    fn from(value: &str) -> Self {
        ConditionType::new(value)
    }
}

impl From<ConditionType> for String {
    fn from(value: ConditionType) -> Self {
        value.0.into_owned()
    }
}

impl std::fmt::Display for ConditionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JsonSchema for ConditionType {
    fn schema_name() -> Cow<'static, str> {
        "ConditionType".into()
    }

    fn inline_schema() -> bool {
        true
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        String::json_schema(generator)
    }
}

/// Condition status following Kubernetes conventions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, Default)]
pub enum ConditionStatus {
    /// Condition holds
    True,
    /// Condition does not hold
    False,
    /// Condition could not be determined
    #[default]
    Unknown,
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionStatus::True => write!(f, "True"),
            ConditionStatus::False => write!(f, "False"),
            ConditionStatus::Unknown => write!(f, "Unknown"),
        }
    }
}
