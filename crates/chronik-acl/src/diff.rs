//! Minimal create/delete batches between two ACL states.

use std::collections::HashSet;

use crate::rule::AclDetail;
use crate::wire::{AclIdentity, CreateAclRequest, DeleteAclsFilter};

/// Bindings to create and delete to move from one state to another
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AclDifference {
    pub to_create: Vec<CreateAclRequest>,
    pub to_delete: Vec<CreateAclRequest>,
}

impl AclDifference {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }

    /// Exact-match filters for everything in `to_delete`.
    pub fn delete_filters(&self) -> Vec<DeleteAclsFilter> {
        self.to_delete.iter().map(DeleteAclsFilter::from).collect()
    }
}

/// Compare `current` against `desired` by binding identity.
///
/// Bindings present on both sides are left alone. Duplicates within one side
/// are reported once, in first-seen order.
pub fn calculate_acl_difference(
    current: &[CreateAclRequest],
    desired: &[CreateAclRequest],
) -> AclDifference {
    let current_ids: HashSet<AclIdentity> =
        current.iter().map(CreateAclRequest::identity).collect();
    let desired_ids: HashSet<AclIdentity> =
        desired.iter().map(CreateAclRequest::identity).collect();

    AclDifference {
        to_create: missing_from(desired, &current_ids),
        to_delete: missing_from(current, &desired_ids),
    }
}

/// Difference between an existing detail and its edited version, both in
/// editor form.
///
/// A changed principal or host makes every binding new, so the old ones are
/// all deleted and the edited ones all created. Both sides are re-encoded, so
/// an empty result means the edit changed nothing, not that the backend
/// already holds exactly these bindings.
pub fn calculate_detail_difference(current: &AclDetail, desired: &AclDetail) -> AclDifference {
    calculate_acl_difference(&current.to_create_requests(), &desired.to_create_requests())
}

/// Changes that turn the stored bindings into `desired`.
///
/// `stored` is what the backend lists, which may spell a rule differently
/// from the editor, e.g. one binding per operation where the editor sends
/// a single `ALL`. Every stored binding `desired` does not produce is
/// deleted.
pub fn calculate_binding_difference(
    stored: &[CreateAclRequest],
    desired: &AclDetail,
) -> AclDifference {
    calculate_acl_difference(stored, &desired.to_create_requests())
}

fn missing_from(
    requests: &[CreateAclRequest],
    other: &HashSet<AclIdentity>,
) -> Vec<CreateAclRequest> {
    let mut seen = HashSet::new();
    requests
        .iter()
        .filter(|request| {
            let id = request.identity();
            !other.contains(&id) && seen.insert(id)
        })
        .cloned()
        .collect()
}
