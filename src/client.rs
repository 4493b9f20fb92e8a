//! Client trait abstracting the TMC EKS API
//!
//! This trait allows mocking the control plane in tests while using the
//! real REST client in production. Implementations must surface 404 and
//! 409 through [`Error::is_not_found`] and [`Error::is_already_exists`];
//! the orchestrator relies on that classification for idempotent
//! create/delete and delete-completion detection.
//!
//! [`Error::is_not_found`]: crate::error::Error::is_not_found
//! [`Error::is_already_exists`]: crate::error::Error::is_already_exists

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::error::Error;
use crate::model::{EksCluster, EksClusterFullName, Nodepool, NodepoolFullName};

/// Operations the lifecycle orchestrator needs from the control plane
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TmcClient: Send + Sync {
    /// Create an EKS cluster
    async fn create_cluster(&self, cluster: &EksCluster) -> Result<EksCluster, Error>;

    /// Get an EKS cluster by full name
    async fn get_cluster(&self, name: &EksClusterFullName) -> Result<EksCluster, Error>;

    /// Update an EKS cluster
    ///
    /// The request must carry the server-managed metadata (`uid`,
    /// `resource_version`) from a recent get.
    async fn update_cluster(&self, cluster: &EksCluster) -> Result<EksCluster, Error>;

    /// Delete an EKS cluster by full name
    async fn delete_cluster(&self, name: &EksClusterFullName) -> Result<(), Error>;

    /// List every nodepool of a cluster
    async fn list_nodepools(&self, cluster: &EksClusterFullName) -> Result<Vec<Nodepool>, Error>;

    /// Create a nodepool
    async fn create_nodepool(&self, nodepool: &Nodepool) -> Result<Nodepool, Error>;

    /// Get a nodepool by full name
    async fn get_nodepool(&self, name: &NodepoolFullName) -> Result<Nodepool, Error>;

    /// Update a nodepool
    ///
    /// Same metadata requirement as [`TmcClient::update_cluster`].
    async fn update_nodepool(&self, nodepool: &Nodepool) -> Result<Nodepool, Error>;

    /// Delete a nodepool by full name
    async fn delete_nodepool(&self, name: &NodepoolFullName) -> Result<(), Error>;
}
