//! GCPMachineProviderSpec
//!
//! Desired state of a GCP virtual machine, embedded in `Machine.spec.providerSpec.value`
//! and read by the GCP actuator to create a single instance.

use crate::serde_helpers::{is_false, null_as_default};
use crate::{API_VERSION, PROVIDER_SPEC_KIND};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference to a Secret in the same namespace as the Machine
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LocalObjectReference {
    /// Name of the referent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl LocalObjectReference {
    /// Reference to the named Secret
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// GcpMachineProviderSpec describes a GCP virtual machine
///
/// `serviceAccounts`, `machineType`, `region` and `zone` have no default and
/// must be present in every payload. Everything else is optional.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GcpMachineProviderSpec {
    /// API version of the payload (machine.openshift.io/v1beta1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Kind of the payload (GCPMachineProviderSpec)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Standard object metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<BTreeMap<String, serde_json::Value>>")]
    pub metadata: Option<ObjectMeta>,

    /// Secret holding the user data to apply to the instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data_secret: Option<LocalObjectReference>,

    /// Secret holding the GCP credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_secret: Option<LocalObjectReference>,

    /// Allow the instance to send and receive packets with non-matching
    /// destination or source IPs (required to forward routes)
    #[serde(default, rename = "canIPForward")]
    #[schemars(rename = "canIPForward")]
    pub can_ip_forward: bool,

    /// Protect the instance against deletion
    #[serde(default)]
    pub deletion_protection: bool,

    /// Disks to attach to the VM
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub disks: Vec<GcpDisk>,

    /// Labels to apply to the VM
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub labels: BTreeMap<String, String>,

    /// Metadata key/value pairs to apply to the VM
    #[serde(
        default,
        rename = "gcpMetadata",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    #[schemars(rename = "gcpMetadata")]
    pub metadata_items: Vec<GcpMetadata>,

    /// Network interfaces to attach to the VM
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub network_interfaces: Vec<GcpNetworkInterface>,

    /// Service accounts used by the VM (required, may be empty)
    #[serde(deserialize_with = "null_as_default")]
    pub service_accounts: Vec<GcpServiceAccount>,

    /// Network tags to apply to the VM
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,

    /// Target pools for network TCP/UDP load balancing
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub target_pools: Vec<String>,

    /// Machine type of the VM (e.g., n1-standard-4)
    pub machine_type: String,

    /// Region in which the VM is created
    pub region: String,

    /// Zone in which the VM is created
    pub zone: String,

    /// Project in which the VM is created
    #[serde(default, rename = "projectID", skip_serializing_if = "Option::is_none")]
    #[schemars(rename = "projectID")]
    pub project_id: Option<String>,

    /// Create the instance as preemptible
    #[serde(default, skip_serializing_if = "is_false")]
    pub preemptible: bool,
}

impl GcpMachineProviderSpec {
    /// Create a spec with the envelope set and every optional field empty
    pub fn new(
        machine_type: impl Into<String>,
        region: impl Into<String>,
        zone: impl Into<String>,
        service_accounts: Vec<GcpServiceAccount>,
    ) -> Self {
        Self {
            api_version: Some(API_VERSION.to_string()),
            kind: Some(PROVIDER_SPEC_KIND.to_string()),
            metadata: None,
            user_data_secret: None,
            credentials_secret: None,
            can_ip_forward: false,
            deletion_protection: false,
            disks: Vec::new(),
            labels: BTreeMap::new(),
            metadata_items: Vec::new(),
            network_interfaces: Vec::new(),
            service_accounts,
            tags: Vec::new(),
            target_pools: Vec::new(),
            machine_type: machine_type.into(),
            region: region.into(),
            zone: zone.into(),
            project_id: None,
            preemptible: false,
        }
    }

    /// First disk flagged as the boot disk
    pub fn boot_disk(&self) -> Option<&GcpDisk> {
        self.disks.iter().find(|disk| disk.boot)
    }

    /// Project the VM lands in, falling back to `default_project`
    pub fn project_for<'a>(&'a self, default_project: &'a str) -> &'a str {
        self.project_id.as_deref().unwrap_or(default_project)
    }
}

/// GcpDisk describes a disk attached to the VM
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GcpDisk {
    /// Delete the disk together with the instance
    #[serde(default)]
    pub auto_delete: bool,

    /// This is the boot disk
    #[serde(default)]
    pub boot: bool,

    /// Size of the disk in GB
    #[serde(default)]
    pub size_gb: i64,

    /// Disk type (e.g., pd-standard, pd-ssd)
    #[serde(default, rename = "type")]
    #[schemars(rename = "type")]
    pub disk_type: String,

    /// Source image used to create the disk
    #[serde(default)]
    pub image: String,

    /// Labels to apply to the disk
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: BTreeMap<String, String>,

    /// Customer-managed encryption key of the disk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<GcpEncryptionKeyReference>,
}

/// Encryption key used for a disk
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GcpEncryptionKeyReference {
    /// KMS key reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_key: Option<GcpKmsKeyReference>,

    /// Service account used for the encryption request.
    /// The Compute Engine default service account is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_key_service_account: Option<String>,
}

/// Fields needed to look up a Cloud KMS key
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GcpKmsKeyReference {
    /// Name of the customer-managed encryption key
    pub name: String,

    /// Key ring the key belongs to
    pub key_ring: String,

    /// Project of the key ring. Defaults to the VM project.
    #[serde(default, rename = "projectID", skip_serializing_if = "Option::is_none")]
    #[schemars(rename = "projectID")]
    pub project_id: Option<String>,

    /// GCP location of the key ring
    pub location: String,
}

impl GcpKmsKeyReference {
    /// Project that owns the key ring
    pub fn resolved_project_id<'a>(&'a self, vm_project: &'a str) -> &'a str {
        self.project_id.as_deref().unwrap_or(vm_project)
    }

    /// Fully-qualified Cloud KMS resource name of the key
    pub fn key_resource_name(&self, vm_project: &str) -> String {
        format!(
            "projects/{}/locations/{}/keyRings/{}/cryptoKeys/{}",
            self.resolved_project_id(vm_project),
            self.location,
            self.key_ring,
            self.name
        )
    }
}

/// Metadata entry applied to the VM
///
/// `value` is always emitted: `null` means unset, `""` means set to empty.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GcpMetadata {
    /// Metadata key
    pub key: String,

    /// Metadata value
    #[serde(default)]
    pub value: Option<String>,
}

impl GcpMetadata {
    /// Entry with a key and a value
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Entry with a key and no value
    pub fn unset(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }
}

/// Network interface attached to the VM
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GcpNetworkInterface {
    /// Assign a public IP
    #[serde(default, rename = "publicIP", skip_serializing_if = "is_false")]
    #[schemars(rename = "publicIP")]
    pub public_ip: bool,

    /// Network name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    /// Project of the network (shared VPC)
    #[serde(default, rename = "projectID", skip_serializing_if = "Option::is_none")]
    #[schemars(rename = "projectID")]
    pub project_id: Option<String>,

    /// Subnetwork name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnetwork: Option<String>,
}

/// Service account attached to the VM
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GcpServiceAccount {
    /// Service account email
    pub email: String,

    /// OAuth scopes granted to the service account
    pub scopes: Vec<String>,
}

impl GcpServiceAccount {
    /// Service account with its OAuth scopes
    pub fn new(email: impl Into<String>, scopes: Vec<String>) -> Self {
        Self {
            email: email.into(),
            scopes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_spec() -> GcpMachineProviderSpec {
        GcpMachineProviderSpec::new(
            "n1-standard-4",
            "us-east1",
            "us-east1-b",
            vec![GcpServiceAccount::new(
                "worker@project.iam.gserviceaccount.com",
                vec!["https://www.googleapis.com/auth/cloud-platform".to_string()],
            )],
        )
    }

    #[test]
    fn test_new_sets_envelope() {
        let spec = minimal_spec();
        assert_eq!(spec.api_version.as_deref(), Some(API_VERSION));
        assert_eq!(spec.kind.as_deref(), Some(PROVIDER_SPEC_KIND));
        assert!(spec.metadata.is_none());
        assert!(!spec.can_ip_forward);
        assert!(!spec.deletion_protection);
        assert!(!spec.preemptible);
    }

    #[test]
    fn test_minimal_spec_wire_keys() {
        let value = serde_json::to_value(minimal_spec()).expect("spec should encode");
        assert_eq!(
            value,
            json!({
                "apiVersion": "machine.openshift.io/v1beta1",
                "kind": "GCPMachineProviderSpec",
                "canIPForward": false,
                "deletionProtection": false,
                "serviceAccounts": [{
                    "email": "worker@project.iam.gserviceaccount.com",
                    "scopes": ["https://www.googleapis.com/auth/cloud-platform"]
                }],
                "machineType": "n1-standard-4",
                "region": "us-east1",
                "zone": "us-east1-b"
            })
        );
    }

    #[test]
    fn test_project_id_omitted_when_absent() {
        let value = serde_json::to_value(minimal_spec()).expect("spec should encode");
        assert!(value.get("projectID").is_none());

        let mut spec = minimal_spec();
        spec.project_id = Some("openshift-dev".to_string());
        let value = serde_json::to_value(&spec).expect("spec should encode");
        assert_eq!(value["projectID"], json!("openshift-dev"));
    }

    #[test]
    fn test_preemptible_emitted_only_when_set() {
        let mut spec = minimal_spec();
        spec.preemptible = true;
        let value = serde_json::to_value(&spec).expect("spec should encode");
        assert_eq!(value["preemptible"], json!(true));
    }

    #[test]
    fn test_booleans_default_false() {
        let spec: GcpMachineProviderSpec = serde_json::from_value(json!({
            "serviceAccounts": [],
            "machineType": "e2-medium",
            "region": "europe-west4",
            "zone": "europe-west4-a"
        }))
        .expect("spec without booleans should decode");
        assert!(!spec.can_ip_forward);
        assert!(!spec.deletion_protection);
        assert!(!spec.preemptible);
    }

    #[test]
    fn test_missing_machine_type_is_error() {
        let result = serde_json::from_value::<GcpMachineProviderSpec>(json!({
            "serviceAccounts": [],
            "region": "us-east1",
            "zone": "us-east1-b"
        }));
        let err = result.expect_err("machineType is required");
        assert!(err.to_string().contains("machineType"));
    }

    #[test]
    fn test_missing_service_accounts_is_error() {
        let result = serde_json::from_value::<GcpMachineProviderSpec>(json!({
            "machineType": "n1-standard-4",
            "region": "us-east1",
            "zone": "us-east1-b"
        }));
        let err = result.expect_err("serviceAccounts is required");
        assert!(err.to_string().contains("serviceAccounts"));
    }

    #[test]
    fn test_disk_without_encryption_key() {
        let disk: GcpDisk = serde_json::from_value(json!({
            "autoDelete": true,
            "boot": true,
            "sizeGb": 128,
            "type": "pd-ssd",
            "image": "projects/rhcos-cloud/global/images/rhcos-415",
            "labels": null
        }))
        .expect("disk should decode");
        assert!(disk.encryption_key.is_none());
        assert!(disk.labels.is_empty());

        let value = serde_json::to_value(&disk).expect("disk should encode");
        assert!(value.get("encryptionKey").is_none());
        assert_eq!(value["labels"], json!({}));
        assert_eq!(value["type"], json!("pd-ssd"));
    }

    #[test]
    fn test_empty_encryption_key_stays_present() {
        let disk: GcpDisk = serde_json::from_value(json!({ "encryptionKey": {} }))
            .expect("disk should decode");
        assert_eq!(disk.encryption_key, Some(GcpEncryptionKeyReference::default()));
    }

    #[test]
    fn test_kms_project_defaults_to_vm_project() {
        let key = GcpKmsKeyReference {
            name: "disk-key".to_string(),
            key_ring: "ocp-ring".to_string(),
            project_id: None,
            location: "global".to_string(),
        };
        assert_eq!(key.resolved_project_id("vm-project"), "vm-project");
        assert_eq!(
            key.key_resource_name("vm-project"),
            "projects/vm-project/locations/global/keyRings/ocp-ring/cryptoKeys/disk-key"
        );
    }

    #[test]
    fn test_kms_project_override() {
        let key = GcpKmsKeyReference {
            name: "disk-key".to_string(),
            key_ring: "ocp-ring".to_string(),
            project_id: Some("kms-project".to_string()),
            location: "us-central1".to_string(),
        };
        assert_eq!(key.resolved_project_id("vm-project"), "kms-project");
        assert!(key.key_resource_name("vm-project").starts_with("projects/kms-project/"));
    }

    #[test]
    fn test_metadata_value_presence() {
        let unset = serde_json::to_value(GcpMetadata::unset("startup-script"))
            .expect("metadata should encode");
        assert_eq!(unset, json!({ "key": "startup-script", "value": null }));

        let empty = serde_json::to_value(GcpMetadata::new("startup-script", ""))
            .expect("metadata should encode");
        assert_eq!(empty, json!({ "key": "startup-script", "value": "" }));

        let missing: GcpMetadata = serde_json::from_value(json!({ "key": "k" }))
            .expect("metadata without value should decode");
        assert_eq!(missing.value, None);
    }

    #[test]
    fn test_network_interface_omits_unset_fields() {
        let value = serde_json::to_value(GcpNetworkInterface::default())
            .expect("interface should encode");
        assert_eq!(value, json!({}));

        let nic = GcpNetworkInterface {
            public_ip: true,
            network: Some("ocp-network".to_string()),
            project_id: None,
            subnetwork: Some("ocp-worker-subnet".to_string()),
        };
        let value = serde_json::to_value(&nic).expect("interface should encode");
        assert_eq!(
            value,
            json!({
                "publicIP": true,
                "network": "ocp-network",
                "subnetwork": "ocp-worker-subnet"
            })
        );
    }

    #[test]
    fn test_boot_disk_and_project_helpers() {
        let mut spec = minimal_spec();
        assert!(spec.boot_disk().is_none());
        spec.disks.push(GcpDisk {
            size_gb: 50,
            ..Default::default()
        });
        spec.disks.push(GcpDisk {
            boot: true,
            size_gb: 128,
            ..Default::default()
        });
        assert_eq!(spec.boot_disk().map(|disk| disk.size_gb), Some(128));

        assert_eq!(spec.project_for("fallback"), "fallback");
        spec.project_id = Some("explicit".to_string());
        assert_eq!(spec.project_for("fallback"), "explicit");
    }
}
