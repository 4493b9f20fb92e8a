//! Nodepool diff planner
//!
//! Classifies each desired nodepool against the remote nodepools into
//! disjoint create, update, and delete sets. Every remote name lands in
//! exactly one of update or delete; every desired name lands in exactly
//! one of create or update.

use std::collections::HashMap;

use tracing::debug;

use crate::compare::specs_equal;
use crate::error::Error;
use crate::model::{Nodepool, NodepoolDefinition, NodepoolFullName, NodepoolSpec};

/// Disjoint operation sets produced by [`plan_nodepools`]
///
/// Create and update entries keep the desired configuration order;
/// delete entries keep the remote listing order. Update entries already
/// carry server-set defaults copied from the remote spec, so they can
/// be sent as-is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodepoolPlan {
    /// Desired nodepools absent remotely
    pub create: Vec<NodepoolDefinition>,
    /// Nodepools present on both sides with a semantic difference
    pub update: Vec<NodepoolDefinition>,
    /// Remote nodepools absent from the desired configuration
    pub delete: Vec<NodepoolFullName>,
}

impl NodepoolPlan {
    /// True when remote state already matches desired state
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }
}

/// Map nodepool names to their position in the desired configuration
///
/// The server returns nodepools in arbitrary order; the position map
/// keeps plan output index-stable with respect to configuration.
/// Duplicate names are rejected: silently letting one definition win
/// would apply half the user's intent.
pub fn position_map(desired: &[NodepoolDefinition]) -> Result<HashMap<String, usize>, Error> {
    let mut positions = HashMap::with_capacity(desired.len());
    for (index, def) in desired.iter().enumerate() {
        if positions.insert(def.name.clone(), index).is_some() {
            return Err(Error::validation_for(
                def.name.as_str(),
                "duplicate nodepool name in configuration",
            ));
        }
    }
    Ok(positions)
}

/// Copy server-set defaults from a remote spec into a desired spec
///
/// AMI type, capacity type, and release version are defaulted by the
/// control plane when the user leaves them unset; without this copy,
/// "unset in config" would look like "set to empty" and plan a
/// spurious update.
pub fn fill_server_defaults(desired: &mut NodepoolSpec, remote: &NodepoolSpec) {
    if desired.ami_type.as_deref().unwrap_or_default().is_empty() {
        desired.ami_type.clone_from(&remote.ami_type);
    }
    if desired.capacity_type.as_deref().unwrap_or_default().is_empty() {
        desired.capacity_type.clone_from(&remote.capacity_type);
    }
    if desired.release_version.as_deref().unwrap_or_default().is_empty() {
        desired.release_version.clone_from(&remote.release_version);
    }
}

/// Classify desired nodepools against remote nodepools
///
/// Validation errors (duplicate desired names, release version on a
/// brand-new nodepool) are raised here, before any network call.
pub fn plan_nodepools(
    desired: &[NodepoolDefinition],
    remote: &[Nodepool],
) -> Result<NodepoolPlan, Error> {
    let positions = position_map(desired)?;

    let mut working: Vec<NodepoolDefinition> = desired.to_vec();
    let mut seen = vec![false; desired.len()];
    let mut update_positions = Vec::new();
    let mut plan = NodepoolPlan::default();

    for pool in remote {
        let name = pool.full_name.name.as_str();
        let Some(&index) = positions.get(name) else {
            debug!(nodepool = %pool.full_name, "remote nodepool not in configuration, will delete");
            plan.delete.push(pool.full_name.clone());
            continue;
        };
        seen[index] = true;

        let def = &mut working[index];
        fill_server_defaults(&mut def.spec, &pool.spec);

        let description_differs = def.description.as_deref().unwrap_or_default()
            != pool.meta.description.as_deref().unwrap_or_default();
        if description_differs || !specs_equal(&def.spec, &pool.spec) {
            debug!(nodepool = %pool.full_name, "spec differs, will update");
            update_positions.push(index);
        } else {
            debug!(nodepool = %pool.full_name, "in sync");
        }
    }

    update_positions.sort_unstable();
    plan.update = update_positions
        .into_iter()
        .map(|i| working[i].clone())
        .collect();

    for (index, def) in working.iter().enumerate() {
        if seen[index] {
            continue;
        }
        // Release version is update-only; the API rejects it on create
        // with an opaque error, so fail before any network call.
        if !def.spec.release_version.as_deref().unwrap_or_default().is_empty() {
            return Err(Error::validation_for(
                def.name.as_str(),
                "release version cannot be set when creating a nodepool",
            ));
        }
        plan.create.push(def.clone());
    }

    Ok(plan)
}
