//! Conversion of edited rules back into wire create requests.

use crate::rule::{AclDetail, Mode, Rule, SharedConfig};
use crate::wire::{AclOperation, AclPermissionType, CreateAclRequest};

/// Expand `rules` into one create request per granted or denied operation.
///
/// `AllowAll`/`DenyAll` rules collapse into a single `ALL` request. Custom
/// rules emit one request per operation that is not `NotSet`.
pub fn rules_to_create_requests(
    rules: &[Rule],
    principal: &str,
    host: &str,
) -> Vec<CreateAclRequest> {
    let mut requests = Vec::new();
    for rule in rules {
        let request = |operation: AclOperation, permission_type: AclPermissionType| {
            CreateAclRequest {
                principal: principal.to_string(),
                resource_type: rule.resource_kind.to_wire(),
                resource_name: rule.resource_name(),
                resource_pattern_type: rule.selector_type.to_wire(),
                host: host.to_string(),
                operation,
                permission_type,
            }
        };

        match rule.mode() {
            Mode::AllowAll => requests.push(request(AclOperation::All, AclPermissionType::Allow)),
            Mode::DenyAll => requests.push(request(AclOperation::All, AclPermissionType::Deny)),
            Mode::Custom => {
                for (operation, permission) in rule.set_operations() {
                    if let Some(permission_type) = permission.to_wire() {
                        requests.push(request(operation, permission_type));
                    }
                }
            }
        }
    }
    requests
}

impl AclDetail {
    /// Create requests for every rule of this detail.
    pub fn to_create_requests(&self) -> Vec<CreateAclRequest> {
        let SharedConfig { principal, host } = &self.shared_config;
        rules_to_create_requests(&self.rules, principal, host)
    }
}
