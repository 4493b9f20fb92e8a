//! EKS cluster types: full names, control-plane spec, remote state

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::nodepool::{NodepoolFullName, ObjectMeta};
use super::status::ClusterStatus;
use crate::error::Error;

/// Composite identifier uniquely addressing an EKS cluster
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EksClusterFullName {
    /// Organization the credential belongs to (server-set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,

    /// AWS credential name registered with TMC
    pub credential_name: String,

    /// AWS region the cluster lives in
    pub region: String,

    /// Cluster name, unique per credential and region
    pub name: String,
}

impl EksClusterFullName {
    /// Create a full name from its user-supplied components
    pub fn new(
        credential_name: impl Into<String>,
        region: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            org_id: None,
            credential_name: credential_name.into(),
            region: region.into(),
            name: name.into(),
        }
    }

    /// Address a nodepool under this cluster
    pub fn nodepool(&self, name: impl Into<String>) -> NodepoolFullName {
        NodepoolFullName {
            org_id: self.org_id.clone(),
            credential_name: self.credential_name.clone(),
            region: self.region.clone(),
            eks_cluster_name: self.name.clone(),
            name: name.into(),
        }
    }

    /// Validate that every user-supplied component is present
    pub fn validate(&self) -> Result<(), Error> {
        for (field, value) in [
            ("credential_name", &self.credential_name),
            ("region", &self.region),
            ("name", &self.name),
        ] {
            if value.is_empty() {
                return Err(Error::validation(format!("{field} cannot be empty")));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for EksClusterFullName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.credential_name, self.region, self.name)
    }
}

/// Pod and service networking configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// CIDR block for Kubernetes services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_cidr: Option<String>,
}

/// Control-plane log types shipped to CloudWatch
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// API server logs
    #[serde(default)]
    pub api_server: bool,
    /// Audit logs
    #[serde(default)]
    pub audit: bool,
    /// Authenticator logs
    #[serde(default)]
    pub authenticator: bool,
    /// Controller manager logs
    #[serde(default)]
    pub controller_manager: bool,
    /// Scheduler logs
    #[serde(default)]
    pub scheduler: bool,
}

/// VPC placement and API endpoint exposure
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VpcConfig {
    /// Expose the API endpoint inside the VPC
    #[serde(default)]
    pub enable_private_access: bool,

    /// Expose the API endpoint publicly
    #[serde(default)]
    pub enable_public_access: bool,

    /// CIDRs allowed to reach the public endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_access_cidrs: Option<Vec<String>>,

    /// Additional security groups for the control plane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_groups: Option<Vec<String>>,

    /// Subnets the control plane attaches to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_ids: Option<Vec<String>>,
}

/// EKS control-plane configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ControlPlaneConfig {
    /// Kubernetes version (e.g., "1.29")
    pub version: String,

    /// IAM role ARN assumed by the control plane
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role_arn: String,

    /// AWS resource tags; inherited by every nodepool on apply
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,

    /// Service networking configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_network_config: Option<NetworkConfig>,

    /// Control-plane logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// VPC placement configuration
    #[serde(default)]
    pub vpc: VpcConfig,
}

/// EKS cluster specification
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EksClusterSpec {
    /// TMC cluster group the cluster is attached to
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cluster_group: String,

    /// TMC proxy configuration name, if traffic goes through one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_name: Option<String>,

    /// Control-plane configuration
    #[serde(default)]
    pub config: ControlPlaneConfig,
}

/// EKS cluster as sent to and returned by the control plane
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EksCluster {
    /// Composite identifier
    pub full_name: EksClusterFullName,

    /// Object metadata
    #[serde(default)]
    pub meta: ObjectMeta,

    /// Cluster specification
    #[serde(default)]
    pub spec: EksClusterSpec,

    /// Status, present once the control plane has observed the cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ClusterStatus>,
}
