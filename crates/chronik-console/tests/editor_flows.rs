//! ACL editor flows against an in-memory ACL service.
//!
//! Covers: create, minimal update, host change, removal, list search and
//! partial batch failure. Bindings are seeded both through the editor and
//! directly, one per operation, the way other tools store them.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chronik_acl::{
    AclDetail, AclOperation, AclPermissionType, AclPolicy, CreateAclRequest, DeleteAclsFilter,
    ListAclsFilter, ListAclsResponse, Mode, OperationPermission, PatternType, ResourceAcls,
    ResourceKind, ResourceType, SelectorType, SharedConfig,
};
use chronik_console::{AclEditor, AclService, ConsoleError, Severity};

/// In-memory backend recording every mutation it receives.
#[derive(Default)]
struct MemoryAclService {
    bindings: Mutex<Vec<CreateAclRequest>>,
    /// Resource names whose mutations fail.
    failing: HashSet<String>,
    creates: Mutex<Vec<CreateAclRequest>>,
    deletes: Mutex<Vec<DeleteAclsFilter>>,
}

impl MemoryAclService {
    fn seeded(bindings: Vec<CreateAclRequest>) -> Self {
        Self {
            bindings: Mutex::new(bindings),
            ..Default::default()
        }
    }

    fn failing_on(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    fn creates(&self) -> Vec<CreateAclRequest> {
        self.creates.lock().unwrap().clone()
    }

    fn deletes(&self) -> Vec<DeleteAclsFilter> {
        self.deletes.lock().unwrap().clone()
    }

    fn binding_count(&self) -> usize {
        self.bindings.lock().unwrap().len()
    }
}

#[async_trait]
impl AclService for MemoryAclService {
    async fn list_acls(
        &self,
        filter: &ListAclsFilter,
    ) -> chronik_console::Result<ListAclsResponse> {
        let bindings = self.bindings.lock().unwrap();
        let mut resources: Vec<ResourceAcls> = Vec::new();
        for binding in bindings.iter() {
            if filter.principal.as_ref().is_some_and(|p| *p != binding.principal)
                || filter.host.as_ref().is_some_and(|h| *h != binding.host)
            {
                continue;
            }
            let policy = AclPolicy {
                principal: binding.principal.clone(),
                host: binding.host.clone(),
                operation: binding.operation,
                permission_type: binding.permission_type,
            };
            match resources.iter_mut().find(|r| {
                r.resource_type == binding.resource_type
                    && r.resource_name == binding.resource_name
                    && r.resource_pattern_type == binding.resource_pattern_type
            }) {
                Some(resource) => resource.acls.push(policy),
                None => resources.push(ResourceAcls {
                    resource_type: binding.resource_type,
                    resource_name: binding.resource_name.clone(),
                    resource_pattern_type: binding.resource_pattern_type,
                    acls: vec![policy],
                }),
            }
        }
        Ok(ListAclsResponse { resources })
    }

    async fn create_acl(&self, request: &CreateAclRequest) -> chronik_console::Result<()> {
        self.creates.lock().unwrap().push(request.clone());
        if self.failing.contains(&request.resource_name) {
            let msg = format!("cannot create on {}", request.resource_name);
            return Err(ConsoleError::AdminApi(msg));
        }
        self.bindings.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn delete_acls(&self, filter: &DeleteAclsFilter) -> chronik_console::Result<u32> {
        self.deletes.lock().unwrap().push(filter.clone());
        if self.failing.contains(&filter.resource_name) {
            let msg = format!("cannot delete on {}", filter.resource_name);
            return Err(ConsoleError::AdminApi(msg));
        }
        let mut bindings = self.bindings.lock().unwrap();
        let before = bindings.len();
        bindings.retain(|b| DeleteAclsFilter::from(b) != *filter);
        Ok((before - bindings.len()) as u32)
    }
}

fn producer_detail(host: &str) -> AclDetail {
    let mut detail = AclDetail::new(SharedConfig::new("User:producer", host));
    detail
        .add_rule(ResourceKind::Topic)
        .set_permission(AclOperation::Write, OperationPermission::Allow);
    let rule = detail.add_rule(ResourceKind::TransactionalId);
    rule.selector_type = SelectorType::Prefix;
    rule.selector_value = "producer-tx-".into();
    rule.set_mode(Mode::AllowAll);
    detail
}

/// One binding per applicable operation of a literal consumer group.
fn per_operation_group(
    principal: &str,
    host: &str,
    group: &str,
    permission: AclPermissionType,
) -> Vec<CreateAclRequest> {
    ResourceKind::ConsumerGroup
        .operations()
        .iter()
        .map(|op| CreateAclRequest {
            principal: principal.into(),
            resource_type: ResourceType::Group,
            resource_name: group.into(),
            resource_pattern_type: PatternType::Literal,
            host: host.into(),
            operation: *op,
            permission_type: permission,
        })
        .collect()
}

fn editor(service: &Arc<MemoryAclService>) -> AclEditor {
    AclEditor::new(service.clone(), 4)
}

#[tokio::test]
async fn test_create_then_load() {
    let service = Arc::new(MemoryAclService::default());
    let editor = editor(&service);

    let report = editor.create(&producer_detail("*")).await.unwrap();
    assert_eq!(report.severity(), Severity::Success);
    assert_eq!(report.created.len(), 2);
    assert_eq!(service.binding_count(), 2);

    let loaded = editor.load("User:producer").await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].rules.len(), 2);
    assert_eq!(loaded[0].rules[1].mode(), Mode::AllowAll);
    assert_eq!(loaded[0].rules[1].selector_value, "producer-tx-");
}

#[tokio::test]
async fn test_create_rejects_invalid_detail() {
    let service = Arc::new(MemoryAclService::default());
    let editor = editor(&service);

    let mut detail = producer_detail("*");
    detail.shared_config.principal = "producer".into();

    let err = editor.create(&detail).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Model(_)));
    assert!(service.creates().is_empty());
}

#[tokio::test]
async fn test_update_sends_only_changes() {
    let service = Arc::new(MemoryAclService::default());
    let editor = editor(&service);
    editor.create(&producer_detail("*")).await.unwrap();

    let current = editor.load_host("User:producer", "*").await.unwrap().unwrap();
    let mut desired = current.clone();
    desired.rules[0].set_permission(AclOperation::Describe, OperationPermission::Allow);
    desired.rules[0].set_permission(AclOperation::Write, OperationPermission::NotSet);

    let creates_before = service.creates().len();
    let report = editor.update(&current, &desired).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.created.len(), 1);
    assert_eq!(report.created[0].operation, AclOperation::Describe);
    assert_eq!(report.deleted.len(), 1);
    assert_eq!(report.deleted[0].operation, AclOperation::Write);
    assert_eq!(service.creates().len(), creates_before + 1);
    assert_eq!(service.binding_count(), 2);
}

#[tokio::test]
async fn test_update_without_changes_is_a_no_op() {
    let service = Arc::new(MemoryAclService::default());
    let editor = editor(&service);
    editor.create(&producer_detail("*")).await.unwrap();

    let current = editor.load_host("User:producer", "*").await.unwrap().unwrap();
    let report = editor.update(&current, &current.clone()).await.unwrap();

    assert_eq!(report.succeeded(), 0);
    assert!(service.deletes().is_empty());
    assert_eq!(service.creates().len(), 2);
}

#[tokio::test]
async fn test_host_change_moves_every_binding() {
    let service = Arc::new(MemoryAclService::default());
    let editor = editor(&service);
    editor.create(&producer_detail("*")).await.unwrap();

    let current = editor.load_host("User:producer", "*").await.unwrap().unwrap();
    let mut desired = current.clone();
    desired.shared_config.host = "10.0.0.5".into();

    let report = editor.update(&current, &desired).await.unwrap();
    assert_eq!(report.deleted.len(), 2);
    assert_eq!(report.created.len(), 2);

    let details = editor.load("User:producer").await.unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].shared_config.host, "10.0.0.5");
}

#[tokio::test]
async fn test_partial_failure_keeps_successes() {
    let service = Arc::new(MemoryAclService::failing_on(&["producer-tx-"]));
    let editor = editor(&service);

    let report = editor.create(&producer_detail("*")).await.unwrap();
    assert_eq!(report.severity(), Severity::Warning);
    assert_eq!(report.created.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.summary().contains("cannot create on producer-tx-"));
    assert_eq!(service.binding_count(), 1);
}

#[tokio::test]
async fn test_total_failure_is_an_error() {
    let service = Arc::new(MemoryAclService::failing_on(&["*", "producer-tx-"]));
    let editor = editor(&service);

    let report = editor.create(&producer_detail("*")).await.unwrap();
    assert_eq!(report.severity(), Severity::Error);
    assert_eq!(report.failures.len(), 2);
}

#[tokio::test]
async fn test_remove_principal_clears_all_hosts() {
    let service = Arc::new(MemoryAclService::default());
    let editor = editor(&service);
    editor.create(&producer_detail("*")).await.unwrap();
    editor.create(&producer_detail("10.0.0.5")).await.unwrap();
    assert_eq!(service.binding_count(), 4);

    let report = editor.remove_principal("User:producer").await.unwrap();
    assert_eq!(report.deleted.len(), 4);
    assert_eq!(service.binding_count(), 0);
}

#[tokio::test]
async fn test_list_search() {
    let service = Arc::new(MemoryAclService::default());
    let editor = editor(&service);
    editor.create(&producer_detail("*")).await.unwrap();

    let mut consumer = AclDetail::new(SharedConfig::new("User:consumer", "192.168.0.3"));
    consumer
        .add_rule(ResourceKind::ConsumerGroup)
        .set_permission(AclOperation::Read, OperationPermission::Allow);
    editor.create(&consumer).await.unwrap();

    assert_eq!(editor.list("").await.unwrap().len(), 2);
    assert_eq!(editor.list("CONSUMER").await.unwrap().len(), 1);
    assert_eq!(editor.list(r"^192\.168").await.unwrap().len(), 1);
    assert!(editor.list("[unclosed").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_principal_deletes_per_operation_bindings() {
    let service = Arc::new(MemoryAclService::seeded(per_operation_group(
        "User:legacy",
        "*",
        "g1",
        AclPermissionType::Allow,
    )));
    let editor = editor(&service);

    let loaded = editor.load("User:legacy").await.unwrap();
    assert_eq!(loaded[0].rules[0].mode(), Mode::AllowAll);

    let report = editor.remove_principal("User:legacy").await.unwrap();
    assert_eq!(report.severity(), Severity::Success);
    assert_eq!(report.deleted.len(), 3);
    assert!(report.deleted.iter().all(|b| b.operation != AclOperation::All));
    assert_eq!(service.binding_count(), 0);
}

#[tokio::test]
async fn test_remove_deletes_stored_bindings_of_one_host() {
    let mut seeded = per_operation_group("User:legacy", "*", "g1", AclPermissionType::Deny);
    seeded.extend(per_operation_group("User:legacy", "10.0.0.5", "g1", AclPermissionType::Deny));
    let service = Arc::new(MemoryAclService::seeded(seeded));
    let editor = editor(&service);

    let detail = editor.load_host("User:legacy", "10.0.0.5").await.unwrap().unwrap();
    assert_eq!(detail.rules[0].mode(), Mode::DenyAll);

    let report = editor.remove(&detail).await.unwrap();
    assert_eq!(report.severity(), Severity::Success);
    assert_eq!(report.deleted.len(), 3);
    assert_eq!(service.binding_count(), 3);
    assert!(editor.load_host("User:legacy", "10.0.0.5").await.unwrap().is_none());
    assert!(editor.load_host("User:legacy", "*").await.unwrap().is_some());
}

#[tokio::test]
async fn test_update_unsets_operation_stored_per_operation() {
    let service = Arc::new(MemoryAclService::seeded(per_operation_group(
        "User:legacy",
        "*",
        "g1",
        AclPermissionType::Allow,
    )));
    let editor = editor(&service);

    let current = editor.load_host("User:legacy", "*").await.unwrap().unwrap();
    let mut desired = current.clone();
    desired.rules[0].set_permission(AclOperation::Delete, OperationPermission::NotSet);

    let report = editor.update(&current, &desired).await.unwrap();
    assert_eq!(report.severity(), Severity::Success);
    assert!(report.created.is_empty());
    assert_eq!(report.deleted.len(), 1);
    assert_eq!(report.deleted[0].operation, AclOperation::Delete);
    assert_eq!(service.binding_count(), 2);

    let after = editor.load_host("User:legacy", "*").await.unwrap().unwrap();
    assert_eq!(after.rules[0].permission(AclOperation::Delete), OperationPermission::NotSet);
    assert_eq!(after.rules[0].permission(AclOperation::Read), OperationPermission::Allow);
}

#[tokio::test]
async fn test_update_switches_per_operation_allow_to_deny_all() {
    let service = Arc::new(MemoryAclService::seeded(per_operation_group(
        "User:legacy",
        "*",
        "g1",
        AclPermissionType::Allow,
    )));
    let editor = editor(&service);

    let current = editor.load_host("User:legacy", "*").await.unwrap().unwrap();
    let mut desired = current.clone();
    desired.rules[0].set_mode(Mode::DenyAll);

    let report = editor.update(&current, &desired).await.unwrap();
    assert!(report.is_success());
    assert_eq!(report.deleted.len(), 3);
    assert_eq!(report.created.len(), 1);
    assert_eq!(report.created[0].operation, AclOperation::All);
    assert_eq!(service.binding_count(), 1);

    let after = editor.load_host("User:legacy", "*").await.unwrap().unwrap();
    assert_eq!(after.rules[0].mode(), Mode::DenyAll);
}
