//! REST implementation of the TMC client traits
//!
//! Speaks the TMC `v1alpha1` EKS endpoints with bearer-token auth.
//! Request and response bodies wrap the resource in a single-field
//! envelope (`{"eksCluster": ...}`, `{"nodepool": ...}`); full-name
//! components the path omits travel as query parameters. Non-success
//! statuses map onto [`Error::Api`] so the orchestrator's 404/409
//! classification works unchanged.

use async_trait::async_trait;
use reqwest::Response;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::client::TmcClient;
use crate::error::Error;
use crate::model::{EksCluster, EksClusterFullName, Nodepool, NodepoolFullName};

const API_VERSION: &str = "v1alpha1";

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClusterEnvelope {
    eks_cluster: EksCluster,
}

#[derive(Deserialize, Serialize)]
struct NodepoolEnvelope {
    nodepool: Nodepool,
}

#[derive(Deserialize)]
struct NodepoolListEnvelope {
    #[serde(default)]
    nodepools: Vec<Nodepool>,
}

/// TMC REST API client
#[derive(Debug)]
pub struct RestClient {
    http: reqwest::Client,
    base: Url,
    token: String,
}

impl RestClient {
    /// Create a client for the given TMC endpoint and API token
    pub fn new(endpoint: &str, token: impl Into<String>) -> Result<Self, Error> {
        let base = Url::parse(endpoint)
            .map_err(|e| Error::validation(format!("invalid TMC endpoint {endpoint:?}: {e}")))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base,
            token: token.into(),
        })
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, Error> {
        let mut url = self
            .base
            .join(path)
            .map_err(|e| Error::internal("rest", format!("invalid path {path:?}: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn cluster_path(name: &str) -> String {
        format!("{API_VERSION}/eksclusters/{name}")
    }

    fn nodepool_collection_path(cluster: &str) -> String {
        format!("{API_VERSION}/eksclusters/{cluster}/nodepools")
    }

    fn nodepool_path(cluster: &str, name: &str) -> String {
        format!("{API_VERSION}/eksclusters/{cluster}/nodepools/{name}")
    }

    fn cluster_query(name: &EksClusterFullName) -> Vec<(&'static str, &str)> {
        vec![
            ("fullName.credentialName", name.credential_name.as_str()),
            ("fullName.region", name.region.as_str()),
        ]
    }

    fn nodepool_query(name: &NodepoolFullName) -> Vec<(&'static str, &str)> {
        vec![
            ("fullName.credentialName", name.credential_name.as_str()),
            ("fullName.region", name.region.as_str()),
        ]
    }

    async fn check(response: Response) -> Result<Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        debug!(status = %status, "api request failed");
        Err(Error::api(message, Some(status.as_u16())))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn send_json<T, B>(&self, method: reqwest::Method, url: Url, body: &B) -> Result<T, Error>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize,
    {
        let response = self
            .http
            .request(method, url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete(&self, url: Url) -> Result<(), Error> {
        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl TmcClient for RestClient {
    async fn create_cluster(&self, cluster: &EksCluster) -> Result<EksCluster, Error> {
        let url = self.url(&format!("{API_VERSION}/eksclusters"), &[])?;
        let envelope: ClusterEnvelope = self
            .send_json(
                reqwest::Method::POST,
                url,
                &ClusterEnvelope {
                    eks_cluster: cluster.clone(),
                },
            )
            .await?;
        Ok(envelope.eks_cluster)
    }

    async fn get_cluster(&self, name: &EksClusterFullName) -> Result<EksCluster, Error> {
        let url = self.url(&Self::cluster_path(&name.name), &Self::cluster_query(name))?;
        let envelope: ClusterEnvelope = self.get_json(url).await?;
        Ok(envelope.eks_cluster)
    }

    async fn update_cluster(&self, cluster: &EksCluster) -> Result<EksCluster, Error> {
        let url = self.url(&Self::cluster_path(&cluster.full_name.name), &[])?;
        let envelope: ClusterEnvelope = self
            .send_json(
                reqwest::Method::PUT,
                url,
                &ClusterEnvelope {
                    eks_cluster: cluster.clone(),
                },
            )
            .await?;
        Ok(envelope.eks_cluster)
    }

    async fn delete_cluster(&self, name: &EksClusterFullName) -> Result<(), Error> {
        let url = self.url(&Self::cluster_path(&name.name), &Self::cluster_query(name))?;
        self.delete(url).await
    }

    async fn list_nodepools(&self, cluster: &EksClusterFullName) -> Result<Vec<Nodepool>, Error> {
        let url = self.url(
            &Self::nodepool_collection_path(&cluster.name),
            &Self::cluster_query(cluster),
        )?;
        let envelope: NodepoolListEnvelope = self.get_json(url).await?;
        Ok(envelope.nodepools)
    }

    async fn create_nodepool(&self, nodepool: &Nodepool) -> Result<Nodepool, Error> {
        let url = self.url(
            &Self::nodepool_collection_path(&nodepool.full_name.eks_cluster_name),
            &[],
        )?;
        let envelope: NodepoolEnvelope = self
            .send_json(
                reqwest::Method::POST,
                url,
                &NodepoolEnvelope {
                    nodepool: nodepool.clone(),
                },
            )
            .await?;
        Ok(envelope.nodepool)
    }

    async fn get_nodepool(&self, name: &NodepoolFullName) -> Result<Nodepool, Error> {
        let url = self.url(
            &Self::nodepool_path(&name.eks_cluster_name, &name.name),
            &Self::nodepool_query(name),
        )?;
        let envelope: NodepoolEnvelope = self.get_json(url).await?;
        Ok(envelope.nodepool)
    }

    async fn update_nodepool(&self, nodepool: &Nodepool) -> Result<Nodepool, Error> {
        let name = &nodepool.full_name;
        let url = self.url(&Self::nodepool_path(&name.eks_cluster_name, &name.name), &[])?;
        let envelope: NodepoolEnvelope = self
            .send_json(
                reqwest::Method::PUT,
                url,
                &NodepoolEnvelope {
                    nodepool: nodepool.clone(),
                },
            )
            .await?;
        Ok(envelope.nodepool)
    }

    async fn delete_nodepool(&self, name: &NodepoolFullName) -> Result<(), Error> {
        let url = self.url(
            &Self::nodepool_path(&name.eks_cluster_name, &name.name),
            &Self::nodepool_query(name),
        )?;
        self.delete(url).await
    }
}
