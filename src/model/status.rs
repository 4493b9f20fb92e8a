//! Remote status types: phases, conditions, and settle-state interpretation
//!
//! Phases are written only by the TMC control plane; the client observes
//! them through polling and never sets them. The settle-state methods
//! decide whether a poll should stop (ready, or terminally failed) or
//! keep going.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::poll::PollState;

/// Condition type the control plane uses to signal overall readiness
pub const READY_CONDITION: &str = "ready";

/// Coarse-grained lifecycle phase of an EKS cluster
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClusterPhase {
    /// Cluster is waiting to be provisioned
    #[default]
    Pending,
    /// Control plane infrastructure is being created
    Creating,
    /// Cluster is fully operational
    Ready,
    /// A spec change is being applied
    Updating,
    /// Control plane version upgrade in progress
    Upgrading,
    /// Cluster is being torn down
    Deleting,
    /// Cluster has encountered an error
    Error,
    /// Account-level resource limits were hit
    OverLimit,
    /// Phase string the client does not recognize
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ClusterPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Creating => "CREATING",
            Self::Ready => "READY",
            Self::Updating => "UPDATING",
            Self::Upgrading => "UPGRADING",
            Self::Deleting => "DELETING",
            Self::Error => "ERROR",
            Self::OverLimit => "OVER_LIMIT",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// Coarse-grained lifecycle phase of a nodepool
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodepoolPhase {
    /// Nodepool infrastructure is being created
    #[default]
    Creating,
    /// Nodepool is fully operational
    Ready,
    /// Scaling configuration change in progress
    Resizing,
    /// Node version upgrade in progress
    Upgrading,
    /// Node version upgrade failed
    UpgradeFailed,
    /// Waiting on the parent cluster
    Waiting,
    /// A spec change is being applied
    Updating,
    /// Nodepool is being torn down
    Deleting,
    /// Nodepool has encountered an error
    Error,
    /// Phase string the client does not recognize
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for NodepoolPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Creating => "CREATING",
            Self::Ready => "READY",
            Self::Resizing => "RESIZING",
            Self::Upgrading => "UPGRADING",
            Self::UpgradeFailed => "UPGRADE_FAILED",
            Self::Waiting => "WAITING",
            Self::Updating => "UPDATING",
            Self::Deleting => "DELETING",
            Self::Error => "ERROR",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// Condition status following Kubernetes conventions
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ConditionStatus {
    /// Condition is true
    True,
    /// Condition is false
    False,
    /// Condition status is unknown
    #[default]
    Unknown,
}

/// Severity of a condition
///
/// Distinguishes a transient non-ready condition from a terminal error.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Informational, resource is settling normally
    #[default]
    Info,
    /// Degraded but may recover on its own
    Warning,
    /// Terminal failure, polling will never see READY
    Error,
    /// Severity string the client does not recognize
    #[serde(other)]
    Unknown,
}

/// Fine-grained status entry keyed by condition type
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition (e.g., "ready")
    #[serde(rename = "type", default)]
    pub type_: String,

    /// Status of the condition
    #[serde(default)]
    pub status: ConditionStatus,

    /// Severity of the condition
    #[serde(default)]
    pub severity: Severity,

    /// Machine-readable reason
    #[serde(default)]
    pub reason: String,

    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

impl Condition {
    /// Create a condition with the given type, severity, reason, and message
    pub fn new(
        type_: impl Into<String>,
        status: ConditionStatus,
        severity: Severity,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            type_: type_.into(),
            status,
            severity,
            reason: reason.into(),
            message: message.into(),
        }
    }
}

/// Inspect a condition map for a terminal ready-condition failure
fn terminal_failure(
    conditions: &BTreeMap<String, Condition>,
    resource: &str,
) -> Option<Error> {
    let ready = conditions.get(READY_CONDITION)?;
    if ready.severity == Severity::Error {
        Some(Error::terminal(resource, &ready.reason, &ready.message))
    } else {
        None
    }
}

/// Status reported by the control plane for an EKS cluster
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    /// Current lifecycle phase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<ClusterPhase>,

    /// Conditions keyed by condition type
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub conditions: BTreeMap<String, Condition>,

    /// EKS platform version, once known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_version: Option<String>,
}

impl ClusterStatus {
    /// Decide whether the cluster has reached a terminal state
    ///
    /// READY is terminal success. A ready condition with severity ERROR
    /// is terminal failure and stops polling immediately. Anything else
    /// keeps polling; the caller's budget is the only bound on how long
    /// a non-terminal phase may persist.
    pub fn settle_state(&self, resource: &str) -> Result<PollState, Error> {
        if self.phase == Some(ClusterPhase::Ready) {
            return Ok(PollState::Settled);
        }
        if let Some(err) = terminal_failure(&self.conditions, resource) {
            return Err(err);
        }
        Ok(PollState::Pending)
    }
}

/// Status reported by the control plane for a nodepool
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodepoolStatus {
    /// Current lifecycle phase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<NodepoolPhase>,

    /// Conditions keyed by condition type
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub conditions: BTreeMap<String, Condition>,
}

impl NodepoolStatus {
    /// Decide whether the nodepool has reached a terminal state
    ///
    /// Same contract as [`ClusterStatus::settle_state`].
    pub fn settle_state(&self, resource: &str) -> Result<PollState, Error> {
        if self.phase == Some(NodepoolPhase::Ready) {
            return Ok(PollState::Settled);
        }
        if let Some(err) = terminal_failure(&self.conditions, resource) {
            return Err(err);
        }
        Ok(PollState::Pending)
    }
}
