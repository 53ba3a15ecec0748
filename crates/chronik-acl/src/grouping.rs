//! Grouping of a flat ACL list into per-principal/host details.

use std::collections::HashMap;

use tracing::debug;

use crate::rule::{
    AclDetail, OperationPermission, ResourceKind, Rule, SelectorType, SharedConfig,
};
use crate::wire::{
    AclOperation, CreateAclRequest, ListAclsResponse, PatternType, ResourceAcls, WILDCARD,
};

type RuleKey = (usize, ResourceKind, SelectorType, String);

/// Build one [`AclDetail`] per distinct `(principal, host)` in `response`.
///
/// Details come out in order of first appearance, and so do the rules inside
/// each detail. A repeated operation on the same selector and host keeps the
/// last permission seen.
pub fn acl_details_from_list_response(response: &ListAclsResponse) -> Vec<AclDetail> {
    let mut details: Vec<AclDetail> = Vec::new();
    let mut detail_index: HashMap<SharedConfig, usize> = HashMap::new();
    let mut rule_index: HashMap<RuleKey, usize> = HashMap::new();

    for resource in &response.resources {
        let Some((kind, selector_type, selector_value)) = decode_selector(resource) else {
            debug!(
                resource_type = resource.resource_type.as_str(),
                pattern_type = resource.resource_pattern_type.as_str(),
                resource_name = %resource.resource_name,
                "Skipping resource the editor cannot represent"
            );
            continue;
        };

        for policy in &resource.acls {
            let Some(permission) = OperationPermission::from_wire(policy.permission_type) else {
                debug!(
                    principal = %policy.principal,
                    permission = policy.permission_type.as_str(),
                    "Skipping policy without allow/deny permission"
                );
                continue;
            };
            if !is_concrete_operation(policy.operation) {
                debug!(
                    principal = %policy.principal,
                    operation = policy.operation.as_str(),
                    "Skipping policy with wildcard operation"
                );
                continue;
            }

            let shared = SharedConfig::new(policy.principal.clone(), policy.host.clone());
            let detail_pos = *detail_index.entry(shared.clone()).or_insert_with(|| {
                details.push(AclDetail::new(shared));
                details.len() - 1
            });
            let detail = &mut details[detail_pos];

            let key = (detail_pos, kind, selector_type, selector_value.clone());
            let rule_pos = *rule_index.entry(key).or_insert_with(|| {
                let id = detail.rules.len() as u32;
                detail
                    .rules
                    .push(Rule::new(id, kind).with_selector(selector_type, selector_value.clone()));
                detail.rules.len() - 1
            });

            detail.rules[rule_pos].set_permission(policy.operation, permission);
        }
    }

    details
}

/// The listed bindings behind [`acl_details_from_list_response`], one
/// request per binding, exactly as the backend stores them.
///
/// Entries the grouping skips are skipped here too, so these are the bindings
/// an edit of the grouped details may delete.
pub fn bindings_from_list_response(response: &ListAclsResponse) -> Vec<CreateAclRequest> {
    response
        .resources
        .iter()
        .filter(|resource| decode_selector(resource).is_some())
        .flat_map(|resource| {
            resource
                .acls
                .iter()
                .filter(|policy| {
                    OperationPermission::from_wire(policy.permission_type).is_some()
                        && is_concrete_operation(policy.operation)
                })
                .map(move |policy| CreateAclRequest {
                    principal: policy.principal.clone(),
                    resource_type: resource.resource_type,
                    resource_name: resource.resource_name.clone(),
                    resource_pattern_type: resource.resource_pattern_type,
                    host: policy.host.clone(),
                    operation: policy.operation,
                    permission_type: policy.permission_type,
                })
        })
        .collect()
}

fn is_concrete_operation(operation: AclOperation) -> bool {
    !matches!(operation, AclOperation::Unspecified | AclOperation::Any)
}

/// Editor selector for a wire resource, `None` if it has no editor form.
fn decode_selector(resource: &ResourceAcls) -> Option<(ResourceKind, SelectorType, String)> {
    let kind = ResourceKind::from_wire(resource.resource_type)?;
    if kind == ResourceKind::Cluster {
        return Some((kind, SelectorType::Any, String::new()));
    }

    match resource.resource_pattern_type {
        PatternType::Literal if resource.resource_name == WILDCARD => {
            Some((kind, SelectorType::Any, String::new()))
        }
        PatternType::Literal => {
            Some((kind, SelectorType::Literal, resource.resource_name.clone()))
        }
        PatternType::Prefixed => {
            Some((kind, SelectorType::Prefix, resource.resource_name.clone()))
        }
        PatternType::Any | PatternType::Unspecified => None,
    }
}
