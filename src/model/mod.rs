//! Data model for EKS clusters and nodepools managed through TMC
//!
//! These types mirror the wire shapes the control plane speaks, with
//! camelCase serialization and optional fields omitted when empty.

pub mod cluster;
pub mod nodepool;
pub mod status;

pub use cluster::{
    ControlPlaneConfig, EksCluster, EksClusterFullName, EksClusterSpec, LoggingConfig,
    NetworkConfig, VpcConfig,
};
pub use nodepool::{
    AmiInfo, LaunchTemplate, Nodepool, NodepoolDefinition, NodepoolFullName, NodepoolSpec,
    ObjectMeta, RemoteAccess, ScalingConfig, Taint, UpdateConfig,
};
pub use status::{
    ClusterPhase, ClusterStatus, Condition, ConditionStatus, NodepoolPhase, NodepoolStatus,
    Severity, READY_CONDITION,
};
