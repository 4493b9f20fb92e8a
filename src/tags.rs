//! Cluster-to-nodepool tag inheritance
//!
//! Clusters carry mandatory AWS tags (cost center, environment) that
//! every nodepool must also carry. Inheritance copies them into the
//! nodepool's tag map without overwriting anything the user set
//! explicitly; an explicit value that disagrees with the cluster value
//! is a conflict the user has to resolve.

use std::collections::BTreeMap;

use crate::error::{Error, TagConflict};

/// Merge cluster-level tags into a nodepool's tag map
///
/// Absent keys are inserted; equal values are left alone; a differing
/// explicit value is never overwritten and is reported as a conflict.
/// Every conflicting key is collected into one [`Error::TagConflict`].
/// Applying the same inputs twice yields the same map and the same
/// conflicts (idempotent).
pub fn inherit_cluster_tags(
    nodepool_tags: &mut BTreeMap<String, String>,
    cluster_tags: &BTreeMap<String, String>,
) -> Result<(), Error> {
    let mut conflicts = Vec::new();

    for (key, cluster_value) in cluster_tags {
        match nodepool_tags.get(key) {
            None => {
                nodepool_tags.insert(key.clone(), cluster_value.clone());
            }
            Some(existing) if existing == cluster_value => {}
            Some(existing) => {
                conflicts.push(TagConflict {
                    key: key.clone(),
                    cluster_value: cluster_value.clone(),
                    nodepool_value: existing.clone(),
                });
            }
        }
    }

    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(Error::TagConflict { conflicts })
    }
}
