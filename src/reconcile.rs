//! Lifecycle orchestrator for EKS clusters and nodepools
//!
//! One apply runs: build desired nodepools from configuration, list the
//! remote ones, plan the diff, then execute creates, updates, and
//! deletes in that fixed order, polling the control plane to a terminal
//! phase after every mutation. Execution is sequential and synchronous;
//! the first failure aborts the remaining plan and already-applied
//! changes are not rolled back.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::client::TmcClient;
use crate::error::Error;
use crate::model::{EksCluster, EksClusterFullName, Nodepool, NodepoolDefinition, NodepoolFullName};
use crate::plan::{plan_nodepools, NodepoolPlan};
use crate::poll::{poll_until_timeout, poll_with_attempts, PollState, DEFAULT_POLL_INTERVAL};
use crate::tags::inherit_cluster_tags;
use crate::wait::WaitPolicy;

/// Attempt budget for delete polling
///
/// Deletion is attempt-bounded rather than time-bounded: 18 attempts at
/// the default 10s interval give roughly a three-minute budget.
pub const DELETE_POLL_ATTEMPTS: u32 = 18;

/// Drives cluster and nodepool state toward desired configuration
pub struct EksReconciler<C> {
    client: C,
    wait: WaitPolicy,
    poll_interval: Duration,
}

impl<C: TmcClient> EksReconciler<C> {
    /// Create a reconciler with the default wait policy and poll interval
    pub fn new(client: C) -> Self {
        Self {
            client,
            wait: WaitPolicy::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the wait policy for readiness polling
    pub fn with_wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    /// Set the sleep between poll attempts
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    // =========================================================================
    // Cluster lifecycle
    // =========================================================================

    /// Create the cluster and all of its nodepools
    ///
    /// A cluster that already exists is treated as a prior
    /// partially-applied apply and reconciled instead of failing.
    #[instrument(skip_all, fields(cluster = %cluster.full_name))]
    pub async fn apply(
        &self,
        cluster: &EksCluster,
        nodepools: Vec<NodepoolDefinition>,
    ) -> Result<(), Error> {
        cluster.full_name.validate()?;

        match self.client.get_cluster(&cluster.full_name).await {
            Ok(current) => {
                if self.cluster_differs(cluster, &current) {
                    self.update_cluster(cluster).await?;
                } else {
                    debug!(cluster = %cluster.full_name, "cluster in sync");
                }
            }
            Err(e) if e.is_not_found() => self.create_cluster(cluster).await?,
            Err(e) => {
                return Err(Error::during("get cluster", cluster.full_name.to_string(), e));
            }
        }

        self.reconcile_nodepools(&cluster.full_name, nodepools, &cluster.spec.config.tags)
            .await
    }

    fn cluster_differs(&self, desired: &EksCluster, current: &EksCluster) -> bool {
        desired.spec != current.spec
            || desired.meta.description.as_deref().unwrap_or_default()
                != current.meta.description.as_deref().unwrap_or_default()
    }

    /// Create a cluster and poll it to READY
    pub async fn create_cluster(&self, cluster: &EksCluster) -> Result<(), Error> {
        let name = &cluster.full_name;
        match self.client.create_cluster(cluster).await {
            Ok(_) => info!(cluster = %name, "cluster creation requested"),
            Err(e) if e.is_already_exists() => {
                info!(cluster = %name, "cluster already exists, resuming");
            }
            Err(e) => return Err(Error::during("create cluster", name.to_string(), e)),
        }
        self.wait_cluster_ready(name).await
    }

    /// Update a cluster and poll it to READY
    ///
    /// Fetches current state first so the request carries the
    /// server-managed metadata the update API requires.
    pub async fn update_cluster(&self, desired: &EksCluster) -> Result<(), Error> {
        let name = &desired.full_name;
        let current = self
            .client
            .get_cluster(name)
            .await
            .map_err(|e| Error::during("get cluster", name.to_string(), e))?;

        let mut request = current;
        request.spec = desired.spec.clone();
        request.meta.description.clone_from(&desired.meta.description);
        request.status = None;

        self.client
            .update_cluster(&request)
            .await
            .map_err(|e| Error::during("update cluster", name.to_string(), e))?;
        info!(cluster = %name, "cluster update requested");

        self.wait_cluster_ready(name).await
    }

    /// Delete a cluster and poll until the control plane forgets it
    ///
    /// An already-absent cluster is success. Deletion polling is
    /// attempt-bounded, unlike create/update readiness.
    pub async fn delete_cluster(&self, name: &EksClusterFullName) -> Result<(), Error> {
        match self.client.delete_cluster(name).await {
            Ok(()) => info!(cluster = %name, "cluster deletion requested"),
            Err(e) if e.is_not_found() => {
                debug!(cluster = %name, "cluster already absent");
                return Ok(());
            }
            Err(e) => return Err(Error::during("delete cluster", name.to_string(), e)),
        }

        if self.wait.timeout().is_none() {
            return Ok(());
        }

        let operation = format!("cluster {name} deleted");
        poll_with_attempts(self.poll_interval, DELETE_POLL_ATTEMPTS, &operation, || {
            async move {
                match self.client.get_cluster(name).await {
                    Ok(_) => Ok(PollState::Pending),
                    Err(e) if e.is_not_found() => Ok(PollState::Settled),
                    Err(e) => Err(e),
                }
            }
        })
        .await
        .map(|_| ())
    }

    async fn wait_cluster_ready(&self, name: &EksClusterFullName) -> Result<(), Error> {
        let Some(timeout) = self.wait.timeout() else {
            debug!(cluster = %name, "polling disabled, not waiting for readiness");
            return Ok(());
        };

        let operation = format!("cluster {name} ready");
        let resource = name.to_string();
        poll_until_timeout(self.poll_interval, timeout, &operation, || {
            let resource = resource.clone();
            async move {
                let cluster = self.client.get_cluster(name).await?;
                match cluster.status {
                    Some(status) => status.settle_state(&resource),
                    None => Ok(PollState::Pending),
                }
            }
        })
        .await
    }

    // =========================================================================
    // Nodepool lifecycle
    // =========================================================================

    /// Bring the cluster's nodepools in line with desired configuration
    ///
    /// Cluster tags are inherited into every desired nodepool before
    /// planning. Operations run creates first, then updates, then
    /// deletes; a failure in one phase leaves earlier phases applied.
    #[instrument(skip_all, fields(cluster = %cluster))]
    pub async fn reconcile_nodepools(
        &self,
        cluster: &EksClusterFullName,
        mut desired: Vec<NodepoolDefinition>,
        cluster_tags: &BTreeMap<String, String>,
    ) -> Result<(), Error> {
        if !cluster_tags.is_empty() {
            for def in &mut desired {
                let tags = def.spec.tags.get_or_insert_with(BTreeMap::new);
                inherit_cluster_tags(tags, cluster_tags)
                    .map_err(|e| Error::during("inherit tags into nodepool", def.name.as_str(), e))?;
            }
        }

        let remote = self
            .client
            .list_nodepools(cluster)
            .await
            .map_err(|e| Error::during("list nodepools", cluster.to_string(), e))?;

        let plan = plan_nodepools(&desired, &remote)?;
        self.execute(cluster, &plan, &remote).await
    }

    async fn execute(
        &self,
        cluster: &EksClusterFullName,
        plan: &NodepoolPlan,
        remote: &[Nodepool],
    ) -> Result<(), Error> {
        info!(
            cluster = %cluster,
            create = plan.create.len(),
            update = plan.update.len(),
            delete = plan.delete.len(),
            "executing nodepool plan"
        );

        for def in &plan.create {
            self.create_nodepool(cluster, def).await?;
        }
        for def in &plan.update {
            self.update_nodepool(def, remote).await?;
        }
        for name in &plan.delete {
            self.delete_nodepool(name).await?;
        }
        Ok(())
    }

    async fn create_nodepool(
        &self,
        cluster: &EksClusterFullName,
        def: &NodepoolDefinition,
    ) -> Result<(), Error> {
        let request = def.to_request(cluster);
        let name = &request.full_name;

        match self.client.create_nodepool(&request).await {
            Ok(_) => info!(nodepool = %name, "nodepool creation requested"),
            Err(e) if e.is_already_exists() => {
                info!(nodepool = %name, "nodepool already exists, resuming");
            }
            Err(e) => return Err(Error::during("create nodepool", name.to_string(), e)),
        }

        self.wait_nodepool_ready(name).await
    }

    async fn update_nodepool(
        &self,
        def: &NodepoolDefinition,
        remote: &[Nodepool],
    ) -> Result<(), Error> {
        let current = remote
            .iter()
            .find(|pool| pool.full_name.name == def.name)
            .ok_or_else(|| {
                Error::internal("reconciler", format!("no remote state for nodepool {}", def.name))
            })?;

        // Carry the remote identity and server-managed metadata; the
        // planner already copied server-set spec defaults into `def`.
        let mut request = current.clone();
        request.meta.description.clone_from(&def.description);
        request.spec = def.spec.clone();
        request.status = None;

        let name = &request.full_name;
        self.client
            .update_nodepool(&request)
            .await
            .map_err(|e| Error::during("update nodepool", name.to_string(), e))?;
        info!(nodepool = %name, "nodepool update requested");

        self.wait_nodepool_ready(name).await
    }

    async fn delete_nodepool(&self, name: &NodepoolFullName) -> Result<(), Error> {
        match self.client.delete_nodepool(name).await {
            Ok(()) => info!(nodepool = %name, "nodepool deletion requested"),
            Err(e) if e.is_not_found() => {
                debug!(nodepool = %name, "nodepool already absent");
                return Ok(());
            }
            Err(e) => return Err(Error::during("delete nodepool", name.to_string(), e)),
        }

        if self.wait.timeout().is_none() {
            return Ok(());
        }

        let operation = format!("nodepool {name} deleted");
        poll_with_attempts(self.poll_interval, DELETE_POLL_ATTEMPTS, &operation, || {
            async move {
                match self.client.get_nodepool(name).await {
                    Ok(_) => Ok(PollState::Pending),
                    Err(e) if e.is_not_found() => Ok(PollState::Settled),
                    Err(e) => Err(e),
                }
            }
        })
        .await
        .map(|_| ())
    }

    async fn wait_nodepool_ready(&self, name: &NodepoolFullName) -> Result<(), Error> {
        let Some(timeout) = self.wait.timeout() else {
            debug!(nodepool = %name, "polling disabled, not waiting for readiness");
            return Ok(());
        };

        let operation = format!("nodepool {name} ready");
        let resource = name.to_string();
        poll_until_timeout(self.poll_interval, timeout, &operation, || {
            let resource = resource.clone();
            async move {
                let pool = self.client.get_nodepool(name).await?;
                match pool.status {
                    Some(status) => status.settle_state(&resource),
                    None => Ok(PollState::Pending),
                }
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTmcClient;
    use crate::model::{
        ClusterStatus, Condition, ConditionStatus, NodepoolPhase, NodepoolSpec, NodepoolStatus,
        ObjectMeta, Severity, READY_CONDITION,
    };
    use mockall::predicate::function;
    use mockall::Sequence;

    fn cluster_name() -> EksClusterFullName {
        EksClusterFullName::new("aws-prod", "us-west-2", "dev")
    }

    fn definition(name: &str) -> NodepoolDefinition {
        NodepoolDefinition {
            name: name.to_string(),
            description: None,
            spec: NodepoolSpec {
                role_arn: "arn:aws:iam::1:role/worker".to_string(),
                instance_types: Some(vec!["t3.medium".to_string()]),
                ..Default::default()
            },
        }
    }

    fn ready_status() -> NodepoolStatus {
        NodepoolStatus {
            phase: Some(NodepoolPhase::Ready),
            conditions: BTreeMap::new(),
        }
    }

    fn remote_pool(name: &str, status: Option<NodepoolStatus>) -> Nodepool {
        Nodepool {
            full_name: cluster_name().nodepool(name),
            meta: ObjectMeta {
                uid: Some(format!("uid-{name}")),
                resource_version: Some("7".to_string()),
                ..Default::default()
            },
            spec: definition(name).spec,
            status,
        }
    }

    fn reconciler(client: MockTmcClient) -> EksReconciler<MockTmcClient> {
        EksReconciler::new(client).with_poll_interval(Duration::from_millis(1))
    }

    // =========================================================================
    // Nodepool Reconciliation Stories
    // =========================================================================

    /// Story: a fresh cluster gets its nodepool created and polled ready
    #[tokio::test]
    async fn story_create_then_poll_until_ready() {
        let mut client = MockTmcClient::new();
        client
            .expect_list_nodepools()
            .times(1)
            .returning(|_| Ok(vec![]));
        client
            .expect_create_nodepool()
            .times(1)
            .returning(|pool| Ok(pool.clone()));

        // First poll still creating, second poll ready.
        let mut polls = 0u32;
        client.expect_get_nodepool().times(2).returning(move |name| {
            polls += 1;
            let status = if polls < 2 {
                NodepoolStatus {
                    phase: Some(NodepoolPhase::Creating),
                    conditions: BTreeMap::new(),
                }
            } else {
                ready_status()
            };
            let mut pool = remote_pool(&name.name, Some(status));
            pool.full_name = name.clone();
            Ok(pool)
        });

        reconciler(client)
            .reconcile_nodepools(&cluster_name(), vec![definition("np-1")], &BTreeMap::new())
            .await
            .unwrap();
    }

    /// Story: re-running an interrupted apply tolerates "already exists"
    #[tokio::test]
    async fn story_create_tolerates_already_exists() {
        let mut client = MockTmcClient::new();
        client
            .expect_list_nodepools()
            .times(1)
            .returning(|_| Ok(vec![]));
        client
            .expect_create_nodepool()
            .times(1)
            .returning(|_| Err(Error::api("nodepool exists", Some(409))));
        client
            .expect_get_nodepool()
            .times(1)
            .returning(|name| Ok(remote_pool(&name.name, Some(ready_status()))));

        reconciler(client)
            .reconcile_nodepools(&cluster_name(), vec![definition("np-1")], &BTreeMap::new())
            .await
            .unwrap();
    }

    /// Story: an update carries the remote identity and metadata
    #[tokio::test]
    async fn story_update_carries_server_metadata() {
        let mut remote = remote_pool("np-1", Some(ready_status()));
        remote.spec.root_disk_size = Some(80);

        let mut desired = definition("np-1");
        desired.spec.root_disk_size = Some(200);

        let mut client = MockTmcClient::new();
        let listed = remote.clone();
        client
            .expect_list_nodepools()
            .times(1)
            .returning(move |_| Ok(vec![listed.clone()]));
        client
            .expect_update_nodepool()
            .with(function(|pool: &Nodepool| {
                pool.meta.uid.as_deref() == Some("uid-np-1")
                    && pool.meta.resource_version.as_deref() == Some("7")
                    && pool.spec.root_disk_size == Some(200)
                    && pool.status.is_none()
            }))
            .times(1)
            .returning(|pool| Ok(pool.clone()));
        client
            .expect_get_nodepool()
            .times(1)
            .returning(|name| Ok(remote_pool(&name.name, Some(ready_status()))));

        reconciler(client)
            .reconcile_nodepools(&cluster_name(), vec![desired], &BTreeMap::new())
            .await
            .unwrap();
    }

    /// Story: a removed nodepool is deleted and polled until absent
    #[tokio::test]
    async fn story_delete_polls_until_not_found() {
        let mut client = MockTmcClient::new();
        client
            .expect_list_nodepools()
            .times(1)
            .returning(|_| Ok(vec![remote_pool("np-old", Some(ready_status()))]));
        client
            .expect_delete_nodepool()
            .times(1)
            .returning(|_| Ok(()));

        // Still there on the first poll, gone on the second.
        let mut polls = 0u32;
        client.expect_get_nodepool().times(2).returning(move |name| {
            polls += 1;
            if polls < 2 {
                Ok(remote_pool(&name.name, Some(ready_status())))
            } else {
                Err(Error::api("not found", Some(404)))
            }
        });

        reconciler(client)
            .reconcile_nodepools(&cluster_name(), vec![], &BTreeMap::new())
            .await
            .unwrap();
    }

    /// Story: creates run before updates, updates before deletes
    #[tokio::test]
    async fn story_phases_run_in_fixed_order() {
        let mut seq = Sequence::new();
        let mut client = MockTmcClient::new();

        let mut stale = remote_pool("np-upd", Some(ready_status()));
        stale.spec.root_disk_size = Some(80);
        let doomed = remote_pool("np-del", Some(ready_status()));

        let listed = vec![stale, doomed];
        client
            .expect_list_nodepools()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(listed.clone()));
        client
            .expect_create_nodepool()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|pool| Ok(pool.clone()));
        client
            .expect_get_nodepool()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|name| Ok(remote_pool(&name.name, Some(ready_status()))));
        client
            .expect_update_nodepool()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|pool| Ok(pool.clone()));
        client
            .expect_get_nodepool()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|name| Ok(remote_pool(&name.name, Some(ready_status()))));
        client
            .expect_delete_nodepool()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        client
            .expect_get_nodepool()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(Error::api("not found", Some(404))));

        let mut desired_upd = definition("np-upd");
        desired_upd.spec.root_disk_size = Some(200);

        reconciler(client)
            .reconcile_nodepools(
                &cluster_name(),
                vec![definition("np-new"), desired_upd],
                &BTreeMap::new(),
            )
            .await
            .unwrap();
    }

    /// Story: a terminal nodepool failure aborts the remaining plan
    #[tokio::test]
    async fn story_terminal_failure_aborts_remaining_plan() {
        let mut client = MockTmcClient::new();
        client
            .expect_list_nodepools()
            .times(1)
            .returning(|_| Ok(vec![remote_pool("np-del", Some(ready_status()))]));
        client
            .expect_create_nodepool()
            .times(1)
            .returning(|pool| Ok(pool.clone()));
        client.expect_get_nodepool().times(1).returning(|name| {
            let status = NodepoolStatus {
                phase: Some(NodepoolPhase::Creating),
                conditions: BTreeMap::from([(
                    READY_CONDITION.to_string(),
                    Condition::new(
                        READY_CONDITION,
                        ConditionStatus::False,
                        Severity::Error,
                        "CREATE_FAILED",
                        "insufficient capacity",
                    ),
                )]),
            };
            Ok(remote_pool(&name.name, Some(status)))
        });
        // Note: expect_delete_nodepool is never registered; reaching the
        // delete phase would fail the test.

        let err = reconciler(client)
            .reconcile_nodepools(&cluster_name(), vec![definition("np-new")], &BTreeMap::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("CREATE_FAILED"));
    }

    /// Story: cluster tags are inherited before planning
    #[tokio::test]
    async fn story_cluster_tags_flow_into_created_nodepools() {
        let mut client = MockTmcClient::new();
        client
            .expect_list_nodepools()
            .times(1)
            .returning(|_| Ok(vec![]));
        client
            .expect_create_nodepool()
            .with(function(|pool: &Nodepool| {
                pool.spec
                    .tags
                    .as_ref()
                    .is_some_and(|t| t.get("env").map(String::as_str) == Some("prod"))
            }))
            .times(1)
            .returning(|pool| Ok(pool.clone()));
        client
            .expect_get_nodepool()
            .times(1)
            .returning(|name| Ok(remote_pool(&name.name, Some(ready_status()))));

        let cluster_tags = BTreeMap::from([("env".to_string(), "prod".to_string())]);
        reconciler(client)
            .reconcile_nodepools(&cluster_name(), vec![definition("np-1")], &cluster_tags)
            .await
            .unwrap();
    }

    /// Story: conflicting tags fail before any network call
    #[tokio::test]
    async fn story_tag_conflict_fails_before_listing() {
        let client = MockTmcClient::new();
        // No expectations: any API call would panic the mock.

        let mut desired = definition("np-1");
        desired.spec.tags = Some(BTreeMap::from([("env".to_string(), "dev".to_string())]));
        let cluster_tags = BTreeMap::from([("env".to_string(), "prod".to_string())]);

        let err = reconciler(client)
            .reconcile_nodepools(&cluster_name(), vec![desired], &cluster_tags)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("env"));
        assert!(err.to_string().contains("np-1"));
    }

    /// Story: do_not_retry fires mutations without polling
    #[tokio::test]
    async fn story_do_not_retry_skips_readiness_polling() {
        let mut client = MockTmcClient::new();
        client
            .expect_list_nodepools()
            .times(1)
            .returning(|_| Ok(vec![]));
        client
            .expect_create_nodepool()
            .times(1)
            .returning(|pool| Ok(pool.clone()));
        // expect_get_nodepool is never registered: polling would panic.

        EksReconciler::new(client)
            .with_wait(WaitPolicy::DoNotRetry)
            .reconcile_nodepools(&cluster_name(), vec![definition("np-1")], &BTreeMap::new())
            .await
            .unwrap();
    }

    // =========================================================================
    // Cluster Lifecycle Stories
    // =========================================================================

    fn sample_cluster() -> EksCluster {
        EksCluster {
            full_name: cluster_name(),
            meta: ObjectMeta::default(),
            spec: crate::model::EksClusterSpec {
                cluster_group: "default".to_string(),
                proxy_name: None,
                config: crate::model::ControlPlaneConfig {
                    version: "1.29".to_string(),
                    ..Default::default()
                },
            },
            status: None,
        }
    }

    fn ready_cluster() -> EksCluster {
        let mut cluster = sample_cluster();
        cluster.status = Some(ClusterStatus {
            phase: Some(crate::model::ClusterPhase::Ready),
            ..Default::default()
        });
        cluster
    }

    /// Story: apply on a missing cluster creates it, then its nodepools
    #[tokio::test]
    async fn story_apply_creates_missing_cluster() {
        let mut client = MockTmcClient::new();
        let mut gets = 0u32;
        client.expect_get_cluster().returning(move |_| {
            gets += 1;
            if gets == 1 {
                Err(Error::api("no such cluster", Some(404)))
            } else {
                Ok(ready_cluster())
            }
        });
        client
            .expect_create_cluster()
            .times(1)
            .returning(|c| Ok(c.clone()));
        client
            .expect_list_nodepools()
            .times(1)
            .returning(|_| Ok(vec![]));

        reconciler(client)
            .apply(&sample_cluster(), vec![])
            .await
            .unwrap();
    }

    /// Story: apply on an in-sync cluster only reconciles nodepools
    #[tokio::test]
    async fn story_apply_skips_update_when_in_sync() {
        let mut client = MockTmcClient::new();
        client
            .expect_get_cluster()
            .times(1)
            .returning(|_| Ok(ready_cluster()));
        client
            .expect_list_nodepools()
            .times(1)
            .returning(|_| Ok(vec![]));
        // expect_update_cluster never registered: an update would panic.

        reconciler(client)
            .apply(&sample_cluster(), vec![])
            .await
            .unwrap();
    }

    /// Story: a spec change updates the cluster and polls it ready
    #[tokio::test]
    async fn story_apply_updates_changed_cluster() {
        let mut desired = sample_cluster();
        desired.spec.config.version = "1.30".to_string();

        let mut client = MockTmcClient::new();
        client
            .expect_get_cluster()
            .returning(|_| Ok(ready_cluster()));
        client
            .expect_update_cluster()
            .with(function(|c: &EksCluster| c.spec.config.version == "1.30"))
            .times(1)
            .returning(|c| Ok(c.clone()));
        client
            .expect_list_nodepools()
            .times(1)
            .returning(|_| Ok(vec![]));

        reconciler(client).apply(&desired, vec![]).await.unwrap();
    }

    /// Story: deleting an already-absent cluster is success
    #[tokio::test]
    async fn story_delete_tolerates_absent_cluster() {
        let mut client = MockTmcClient::new();
        client
            .expect_delete_cluster()
            .times(1)
            .returning(|_| Err(Error::api("no such cluster", Some(404))));

        reconciler(client).delete_cluster(&cluster_name()).await.unwrap();
    }

    /// Story: cluster deletion polls until the API returns 404
    #[tokio::test]
    async fn story_delete_cluster_polls_until_absent() {
        let mut client = MockTmcClient::new();
        client.expect_delete_cluster().times(1).returning(|_| Ok(()));

        let mut polls = 0u32;
        client.expect_get_cluster().times(2).returning(move |_| {
            polls += 1;
            if polls < 2 {
                Ok(ready_cluster())
            } else {
                Err(Error::api("gone", Some(404)))
            }
        });

        reconciler(client).delete_cluster(&cluster_name()).await.unwrap();
    }
}
