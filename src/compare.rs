//! Equality oracle for nodepool specifications
//!
//! The control plane normalizes what it stores: collections come back in
//! arbitrary order, unset fields come back empty, and optional
//! sub-objects come back zero-valued. These comparisons tolerate all of
//! that so an apply that changed nothing plans no update.
//!
//! Invariants:
//! - `None` and an empty collection are equal everywhere.
//! - Set-valued fields compare order-insensitively.
//! - A missing sub-object equals a sub-object with all defaults.
//!
//! All functions are pure.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::model::{NodepoolSpec, RemoteAccess, Taint};

/// Order-insensitive equality of two string sets
///
/// Lists of different length are never equal; membership is tested via a
/// lookup set, so duplicates count as membership rather than
/// multiplicity. `None` equals an empty list.
pub fn sets_equal(a: Option<&[String]>, b: Option<&[String]>) -> bool {
    let a = a.unwrap_or_default();
    let b = b.unwrap_or_default();
    if a.len() != b.len() {
        return false;
    }
    let lookup: HashSet<&str> = b.iter().map(String::as_str).collect();
    a.iter().all(|item| lookup.contains(item.as_str()))
}

/// Key-by-key equality of two string maps, with `None` equal to empty
pub fn maps_equal(
    a: Option<&BTreeMap<String, String>>,
    b: Option<&BTreeMap<String, String>>,
) -> bool {
    static EMPTY: BTreeMap<String, String> = BTreeMap::new();
    a.unwrap_or(&EMPTY) == b.unwrap_or(&EMPTY)
}

/// Order-insensitive equality of two taint lists, keyed by taint key
///
/// Duplicate keys within one list are last-write-wins.
pub fn taints_equal(a: Option<&[Taint]>, b: Option<&[Taint]>) -> bool {
    fn by_key(taints: &[Taint]) -> HashMap<&str, (&str, &str)> {
        taints
            .iter()
            .map(|t| {
                (
                    t.key.as_str(),
                    (
                        t.value.as_deref().unwrap_or_default(),
                        t.effect.as_deref().unwrap_or_default(),
                    ),
                )
            })
            .collect()
    }
    by_key(a.unwrap_or_default()) == by_key(b.unwrap_or_default())
}

/// Equality of two remote-access configs
///
/// The security-group list has set semantics; the key name compares as a
/// plain string with `None` equal to empty.
pub fn remote_access_equal(a: Option<&RemoteAccess>, b: Option<&RemoteAccess>) -> bool {
    static EMPTY: RemoteAccess = RemoteAccess {
        ssh_key: None,
        security_groups: None,
    };
    let a = a.unwrap_or(&EMPTY);
    let b = b.unwrap_or(&EMPTY);
    a.ssh_key.as_deref().unwrap_or_default() == b.ssh_key.as_deref().unwrap_or_default()
        && sets_equal(a.security_groups.as_deref(), b.security_groups.as_deref())
}

/// Equality of optional sub-objects, treating `None` as the zero value
fn opt_struct_equal<T: Clone + Default + PartialEq>(a: Option<&T>, b: Option<&T>) -> bool {
    a.cloned().unwrap_or_default() == b.cloned().unwrap_or_default()
}

fn opt_str_equal(a: Option<&str>, b: Option<&str>) -> bool {
    a.unwrap_or_default() == b.unwrap_or_default()
}

/// Full semantic equality of two nodepool specifications
///
/// Composes primitive, set, map, struct, taint, and remote-access
/// equality. Callers must copy server-set defaults into the desired spec
/// first (see [`crate::plan::fill_server_defaults`]) or unset fields
/// will look like changes.
pub fn specs_equal(a: &NodepoolSpec, b: &NodepoolSpec) -> bool {
    opt_str_equal(a.ami_type.as_deref(), b.ami_type.as_deref())
        && opt_str_equal(a.capacity_type.as_deref(), b.capacity_type.as_deref())
        && opt_str_equal(a.release_version.as_deref(), b.release_version.as_deref())
        && a.role_arn == b.role_arn
        && a.root_disk_size.unwrap_or_default() == b.root_disk_size.unwrap_or_default()
        && sets_equal(a.instance_types.as_deref(), b.instance_types.as_deref())
        && sets_equal(a.subnet_ids.as_deref(), b.subnet_ids.as_deref())
        && opt_struct_equal(a.ami_info.as_ref(), b.ami_info.as_ref())
        && opt_struct_equal(a.launch_template.as_ref(), b.launch_template.as_ref())
        && opt_struct_equal(a.scaling_config.as_ref(), b.scaling_config.as_ref())
        && opt_struct_equal(a.update_config.as_ref(), b.update_config.as_ref())
        && maps_equal(a.node_labels.as_ref(), b.node_labels.as_ref())
        && maps_equal(a.tags.as_ref(), b.tags.as_ref())
        && taints_equal(a.taints.as_deref(), b.taints.as_deref())
        && remote_access_equal(a.remote_access.as_ref(), b.remote_access.as_ref())
}
