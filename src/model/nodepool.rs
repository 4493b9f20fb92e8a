//! Nodepool types: desired definitions and remote state
//!
//! A [`NodepoolDefinition`] is desired state built fresh from
//! configuration on every apply; a [`Nodepool`] is what the control
//! plane returned, authoritative for identity and for fields the server
//! defaults (AMI type, capacity type, release version).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::cluster::EksClusterFullName;
use super::status::NodepoolStatus;

/// Composite identifier uniquely addressing a nodepool
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodepoolFullName {
    /// Organization the credential belongs to (server-set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,

    /// AWS credential name registered with TMC
    pub credential_name: String,

    /// AWS region of the parent cluster
    pub region: String,

    /// Name of the parent EKS cluster
    pub eks_cluster_name: String,

    /// Nodepool name, unique within the cluster
    pub name: String,
}

impl std::fmt::Display for NodepoolFullName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.credential_name, self.region, self.eks_cluster_name, self.name
        )
    }
}

/// Object metadata shared by clusters and nodepools
///
/// `uid` and `resource_version` are server-managed; they are copied back
/// into update requests so the API can enforce optimistic concurrency.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// User labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Annotations, including server-set bookkeeping
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    /// Server-assigned unique id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    /// Server-assigned version for optimistic concurrency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

/// Kubernetes taint applied to every node in a pool
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Taint {
    /// Taint key, unique within one nodepool's taint list
    pub key: String,

    /// Taint value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Taint effect (e.g., "NO_SCHEDULE", "NO_EXECUTE")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
}

/// Custom AMI configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AmiInfo {
    /// Custom AMI id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ami_id: Option<String>,

    /// Bootstrap command override for custom AMIs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_bootstrap_cmd: Option<String>,
}

/// EC2 launch template reference
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LaunchTemplate {
    /// Launch template id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Launch template name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Launch template version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Autoscaling bounds for a nodepool
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScalingConfig {
    /// Target node count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_size: Option<u32>,

    /// Maximum node count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u32>,

    /// Minimum node count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u32>,
}

/// Rolling-update limits for a nodepool
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfig {
    /// Maximum nodes unavailable at once, as an absolute count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_unavailable_nodes: Option<String>,

    /// Maximum nodes unavailable at once, as a percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_unavailable_percentage: Option<String>,
}

/// SSH access configuration for pool nodes
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAccess {
    /// EC2 key pair name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,

    /// Security groups allowed to reach the nodes (set semantics)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_groups: Option<Vec<String>>,
}

/// Specification of a nodepool
///
/// Collection-valued fields have set semantics (`instance_types`,
/// `subnet_ids`) or are keyed (`taints` by key); `None` and empty are
/// interchangeable everywhere. See the equality oracle in
/// [`crate::compare`] for the comparison contract.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodepoolSpec {
    /// AMI type (e.g., "AL2_x86_64"); server-defaulted when empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ami_type: Option<String>,

    /// Custom AMI configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ami_info: Option<AmiInfo>,

    /// Capacity type ("ON_DEMAND" or "SPOT"); server-defaulted when empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_type: Option<String>,

    /// Root disk size in GiB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_disk_size: Option<u32>,

    /// IAM role ARN assumed by pool nodes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role_arn: String,

    /// EKS node release version; update-only, server-defaulted on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_version: Option<String>,

    /// EC2 instance types (set semantics)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_types: Option<Vec<String>>,

    /// Subnets the pool may place nodes in (set semantics)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_ids: Option<Vec<String>>,

    /// Kubernetes labels applied to pool nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_labels: Option<BTreeMap<String, String>>,

    /// AWS resource tags, merged with cluster-level tags on apply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,

    /// Taints applied to pool nodes, keyed by taint key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taints: Option<Vec<Taint>>,

    /// Launch template reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_template: Option<LaunchTemplate>,

    /// Autoscaling bounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling_config: Option<ScalingConfig>,

    /// Rolling-update limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_config: Option<UpdateConfig>,

    /// SSH access configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_access: Option<RemoteAccess>,
}

/// Remote nodepool as returned by the control plane
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Nodepool {
    /// Composite identifier
    pub full_name: NodepoolFullName,

    /// Object metadata
    #[serde(default)]
    pub meta: ObjectMeta,

    /// Nodepool specification
    #[serde(default)]
    pub spec: NodepoolSpec,

    /// Status, present once the control plane has observed the pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NodepoolStatus>,
}

/// Desired nodepool built from configuration
///
/// Immutable during one reconciliation pass, except that the planner
/// copies server-set defaults into a working clone before comparing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodepoolDefinition {
    /// Nodepool name, unique within the cluster
    pub name: String,

    /// Free-form description
    pub description: Option<String>,

    /// Desired specification
    pub spec: NodepoolSpec,
}

impl NodepoolDefinition {
    /// Build the API request object for this definition under a cluster
    pub fn to_request(&self, cluster: &EksClusterFullName) -> Nodepool {
        Nodepool {
            full_name: cluster.nodepool(&self.name),
            meta: ObjectMeta {
                description: self.description.clone(),
                ..Default::default()
            },
            spec: self.spec.clone(),
            status: None,
        }
    }
}
