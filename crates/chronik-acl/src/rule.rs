//! Editing representation of ACLs.
//!
//! The console edits ACLs per `(principal, host)` pair. Each pair is an
//! [`AclDetail`] holding one [`Rule`] per resource selector, and each rule
//! carries a tri-state permission per operation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::wire::{AclOperation, AclPermissionType, PatternType, ResourceType, WILDCARD};
use crate::{AclModelError, Result};

/// State of a single operation within a rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationPermission {
    #[default]
    NotSet,
    Allow,
    Deny,
}

impl OperationPermission {
    /// Wire permission, `None` for [`OperationPermission::NotSet`].
    pub fn to_wire(self) -> Option<AclPermissionType> {
        match self {
            OperationPermission::NotSet => None,
            OperationPermission::Allow => Some(AclPermissionType::Allow),
            OperationPermission::Deny => Some(AclPermissionType::Deny),
        }
    }

    pub fn from_wire(permission: AclPermissionType) -> Option<Self> {
        match permission {
            AclPermissionType::Allow => Some(OperationPermission::Allow),
            AclPermissionType::Deny => Some(OperationPermission::Deny),
            AclPermissionType::Unspecified | AclPermissionType::Any => None,
        }
    }
}

/// Resource types the editor can express
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    Cluster,
    Topic,
    ConsumerGroup,
    TransactionalId,
    Subject,
    SchemaRegistry,
}

const CLUSTER_OPERATIONS: &[AclOperation] = &[
    AclOperation::Alter,
    AclOperation::AlterConfigs,
    AclOperation::ClusterAction,
    AclOperation::Create,
    AclOperation::Describe,
    AclOperation::DescribeConfigs,
    AclOperation::IdempotentWrite,
];

const TOPIC_OPERATIONS: &[AclOperation] = &[
    AclOperation::Read,
    AclOperation::Write,
    AclOperation::Create,
    AclOperation::Delete,
    AclOperation::Alter,
    AclOperation::AlterConfigs,
    AclOperation::Describe,
    AclOperation::DescribeConfigs,
];

const CONSUMER_GROUP_OPERATIONS: &[AclOperation] = &[
    AclOperation::Read,
    AclOperation::Delete,
    AclOperation::Describe,
];

const TRANSACTIONAL_ID_OPERATIONS: &[AclOperation] =
    &[AclOperation::Describe, AclOperation::Write];

const SUBJECT_OPERATIONS: &[AclOperation] = &[
    AclOperation::Read,
    AclOperation::Write,
    AclOperation::Delete,
    AclOperation::Describe,
    AclOperation::DescribeConfigs,
    AclOperation::AlterConfigs,
];

const SCHEMA_REGISTRY_OPERATIONS: &[AclOperation] = &[
    AclOperation::Describe,
    AclOperation::DescribeConfigs,
    AclOperation::AlterConfigs,
];

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Cluster,
        ResourceKind::Topic,
        ResourceKind::ConsumerGroup,
        ResourceKind::TransactionalId,
        ResourceKind::Subject,
        ResourceKind::SchemaRegistry,
    ];

    /// Operations that can be granted on this kind of resource.
    pub fn operations(self) -> &'static [AclOperation] {
        match self {
            ResourceKind::Cluster => CLUSTER_OPERATIONS,
            ResourceKind::Topic => TOPIC_OPERATIONS,
            ResourceKind::ConsumerGroup => CONSUMER_GROUP_OPERATIONS,
            ResourceKind::TransactionalId => TRANSACTIONAL_ID_OPERATIONS,
            ResourceKind::Subject => SUBJECT_OPERATIONS,
            ResourceKind::SchemaRegistry => SCHEMA_REGISTRY_OPERATIONS,
        }
    }

    pub fn to_wire(self) -> ResourceType {
        match self {
            ResourceKind::Cluster => ResourceType::Cluster,
            ResourceKind::Topic => ResourceType::Topic,
            ResourceKind::ConsumerGroup => ResourceType::Group,
            ResourceKind::TransactionalId => ResourceType::TransactionalId,
            ResourceKind::Subject => ResourceType::Subject,
            ResourceKind::SchemaRegistry => ResourceType::Registry,
        }
    }

    pub fn from_wire(resource_type: ResourceType) -> Option<Self> {
        match resource_type {
            ResourceType::Cluster => Some(ResourceKind::Cluster),
            ResourceType::Topic => Some(ResourceKind::Topic),
            ResourceType::Group => Some(ResourceKind::ConsumerGroup),
            ResourceType::TransactionalId => Some(ResourceKind::TransactionalId),
            ResourceType::Subject => Some(ResourceKind::Subject),
            ResourceType::Registry => Some(ResourceKind::SchemaRegistry),
            ResourceType::Unspecified | ResourceType::Any => None,
        }
    }
}

/// How a rule selects resource names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectorType {
    #[default]
    Any,
    Literal,
    Prefix,
}

impl SelectorType {
    /// Pattern type sent to the backend. `Any` goes out as a literal `*`.
    pub fn to_wire(self) -> PatternType {
        match self {
            SelectorType::Any | SelectorType::Literal => PatternType::Literal,
            SelectorType::Prefix => PatternType::Prefixed,
        }
    }
}

/// Summary of a rule's operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    AllowAll,
    DenyAll,
    Custom,
}

/// Permissions for one resource selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// List key, unique within one [`AclDetail`] only.
    pub id: u32,
    pub resource_kind: ResourceKind,
    pub selector_type: SelectorType,
    pub selector_value: String,
    pub operations: BTreeMap<AclOperation, OperationPermission>,
}

impl Rule {
    /// Empty custom rule matching any resource of `kind`.
    pub fn new(id: u32, resource_kind: ResourceKind) -> Self {
        Self {
            id,
            resource_kind,
            selector_type: SelectorType::Any,
            selector_value: String::new(),
            operations: BTreeMap::new(),
        }
    }

    pub fn with_selector(mut self, selector_type: SelectorType, value: impl Into<String>) -> Self {
        self.selector_type = selector_type;
        self.selector_value = value.into();
        self
    }

    pub fn with_permission(
        mut self,
        operation: AclOperation,
        permission: OperationPermission,
    ) -> Self {
        self.set_permission(operation, permission);
        self
    }

    /// Selector key rules are grouped and compared by.
    pub fn selector(&self) -> (ResourceKind, SelectorType, &str) {
        (self.resource_kind, self.selector_type, self.selector_value.as_str())
    }

    /// Current state of `operation`. A synthetic `ALL` entry covers every
    /// operation it is not overridden for.
    pub fn permission(&self, operation: AclOperation) -> OperationPermission {
        match self.operations.get(&operation) {
            Some(permission) if *permission != OperationPermission::NotSet => *permission,
            _ => self
                .operations
                .get(&AclOperation::All)
                .copied()
                .unwrap_or_default(),
        }
    }

    pub fn set_permission(&mut self, operation: AclOperation, permission: OperationPermission) {
        self.operations.insert(operation, permission);
    }

    /// Operations with an allow or deny value, in wire order.
    pub fn set_operations(&self) -> impl Iterator<Item = (AclOperation, OperationPermission)> + '_ {
        self.operations
            .iter()
            .filter(|(_, permission)| **permission != OperationPermission::NotSet)
            .map(|(operation, permission)| (*operation, *permission))
    }

    pub fn mode(&self) -> Mode {
        match self.operations.get(&AclOperation::All) {
            Some(OperationPermission::Allow) => return Mode::AllowAll,
            Some(OperationPermission::Deny) => return Mode::DenyAll,
            _ => {}
        }

        let set: Vec<OperationPermission> = self.set_operations().map(|(_, p)| p).collect();
        if set.len() != self.resource_kind.operations().len() {
            return Mode::Custom;
        }
        if set.iter().all(|p| *p == OperationPermission::Allow) {
            Mode::AllowAll
        } else if set.iter().all(|p| *p == OperationPermission::Deny) {
            Mode::DenyAll
        } else {
            Mode::Custom
        }
    }

    /// Switch the rule to `mode`.
    ///
    /// `AllowAll` and `DenyAll` overwrite every applicable operation.
    /// `Custom` keeps the current states but resolves a synthetic `ALL`
    /// entry into explicit per-operation values so they can be edited.
    pub fn set_mode(&mut self, mode: Mode) {
        let fill = match mode {
            Mode::AllowAll => OperationPermission::Allow,
            Mode::DenyAll => OperationPermission::Deny,
            Mode::Custom => {
                if let Some(all) = self.operations.remove(&AclOperation::All) {
                    for operation in self.resource_kind.operations() {
                        let current = self.operations.entry(*operation).or_default();
                        if *current == OperationPermission::NotSet {
                            *current = all;
                        }
                    }
                }
                return;
            }
        };

        self.operations = self
            .resource_kind
            .operations()
            .iter()
            .map(|operation| (*operation, fill))
            .collect();
    }

    /// Resource name sent to the backend for this rule.
    pub fn resource_name(&self) -> String {
        if self.resource_kind == ResourceKind::Cluster {
            return crate::wire::CLUSTER_RESOURCE_NAME.to_string();
        }
        if self.selector_value.is_empty() {
            WILDCARD.to_string()
        } else {
            self.selector_value.clone()
        }
    }
}

/// Kind of authenticated identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrincipalType {
    User,
    Role,
    Group,
    Other(String),
}

impl PrincipalType {
    pub fn as_str(&self) -> &str {
        match self {
            PrincipalType::User => "User",
            PrincipalType::Role => "RedpandaRole",
            PrincipalType::Group => "Group",
            PrincipalType::Other(kind) => kind.as_str(),
        }
    }
}

/// `Type:name` principal
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Principal {
    pub kind: PrincipalType,
    pub name: String,
}

impl Principal {
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            kind: PrincipalType::User,
            name: name.into(),
        }
    }

    pub fn role(name: impl Into<String>) -> Self {
        Self {
            kind: PrincipalType::Role,
            name: name.into(),
        }
    }
}

impl FromStr for Principal {
    type Err = AclModelError;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, name) = s
            .split_once(':')
            .ok_or_else(|| AclModelError::InvalidPrincipal(s.to_string()))?;
        if kind.is_empty() || name.is_empty() {
            return Err(AclModelError::InvalidPrincipal(s.to_string()));
        }

        let kind = match kind {
            "User" => PrincipalType::User,
            "RedpandaRole" | "Role" => PrincipalType::Role,
            "Group" => PrincipalType::Group,
            other => PrincipalType::Other(other.to_string()),
        };
        Ok(Self {
            kind,
            name: name.to_string(),
        })
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.name)
    }
}

/// Principal and host every rule of an [`AclDetail`] applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SharedConfig {
    pub principal: String,
    pub host: String,
}

impl SharedConfig {
    pub fn new(principal: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            host: host.into(),
        }
    }

    /// Principal on any host.
    pub fn any_host(principal: impl Into<String>) -> Self {
        Self::new(principal, WILDCARD)
    }
}

/// All rules of one principal on one host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclDetail {
    pub shared_config: SharedConfig,
    pub rules: Vec<Rule>,
}

impl AclDetail {
    pub fn new(shared_config: SharedConfig) -> Self {
        Self {
            shared_config,
            rules: Vec::new(),
        }
    }

    pub fn next_rule_id(&self) -> u32 {
        self.rules.iter().map(|r| r.id + 1).max().unwrap_or(0)
    }

    /// Append an empty rule and return it for editing.
    pub fn add_rule(&mut self, resource_kind: ResourceKind) -> &mut Rule {
        let rule = Rule::new(self.next_rule_id(), resource_kind);
        self.rules.push(rule);
        let last = self.rules.len() - 1;
        &mut self.rules[last]
    }

    pub fn remove_rule(&mut self, id: u32) -> Option<Rule> {
        let index = self.rules.iter().position(|r| r.id == id)?;
        Some(self.rules.remove(index))
    }

    pub fn rule_mut(&mut self, id: u32) -> Option<&mut Rule> {
        self.rules.iter_mut().find(|r| r.id == id)
    }
}
