//! Wire vocabulary of the ACL admin API.
//!
//! These are the flat records exchanged with the backend: list responses
//! carry resources with their policies, and mutations are expressed as one
//! create request or delete filter per binding.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name the cluster resource is always stored under.
pub const CLUSTER_RESOURCE_NAME: &str = "kafka-cluster";

/// Wildcard for resource names and hosts.
pub const WILDCARD: &str = "*";

/// ACL resource type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i8)]
pub enum ResourceType {
    Unspecified = 0,
    Any = 1,
    Topic = 2,
    Group = 3,
    Cluster = 4,
    TransactionalId = 5,
    Subject = 6,
    Registry = 7,
}

impl ResourceType {
    pub fn from_i8(value: i8) -> Self {
        match value {
            1 => ResourceType::Any,
            2 => ResourceType::Topic,
            3 => ResourceType::Group,
            4 => ResourceType::Cluster,
            5 => ResourceType::TransactionalId,
            6 => ResourceType::Subject,
            7 => ResourceType::Registry,
            _ => ResourceType::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Unspecified => "UNSPECIFIED",
            ResourceType::Any => "ANY",
            ResourceType::Topic => "TOPIC",
            ResourceType::Group => "GROUP",
            ResourceType::Cluster => "CLUSTER",
            ResourceType::TransactionalId => "TRANSACTIONAL_ID",
            ResourceType::Subject => "SUBJECT",
            ResourceType::Registry => "REGISTRY",
        }
    }
}

/// ACL resource pattern type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i8)]
pub enum PatternType {
    Unspecified = 0,
    Any = 1,
    Literal = 3,
    Prefixed = 4,
}

impl PatternType {
    pub fn from_i8(value: i8) -> Self {
        match value {
            1 => PatternType::Any,
            3 => PatternType::Literal,
            4 => PatternType::Prefixed,
            _ => PatternType::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Unspecified => "UNSPECIFIED",
            PatternType::Any => "ANY",
            PatternType::Literal => "LITERAL",
            PatternType::Prefixed => "PREFIXED",
        }
    }
}

/// ACL operation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i8)]
pub enum AclOperation {
    Unspecified = 0,
    Any = 1,
    All = 2,
    Read = 3,
    Write = 4,
    Create = 5,
    Delete = 6,
    Alter = 7,
    Describe = 8,
    ClusterAction = 9,
    DescribeConfigs = 10,
    AlterConfigs = 11,
    IdempotentWrite = 12,
}

impl AclOperation {
    pub fn from_i8(value: i8) -> Self {
        match value {
            1 => AclOperation::Any,
            2 => AclOperation::All,
            3 => AclOperation::Read,
            4 => AclOperation::Write,
            5 => AclOperation::Create,
            6 => AclOperation::Delete,
            7 => AclOperation::Alter,
            8 => AclOperation::Describe,
            9 => AclOperation::ClusterAction,
            10 => AclOperation::DescribeConfigs,
            11 => AclOperation::AlterConfigs,
            12 => AclOperation::IdempotentWrite,
            _ => AclOperation::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AclOperation::Unspecified => "UNSPECIFIED",
            AclOperation::Any => "ANY",
            AclOperation::All => "ALL",
            AclOperation::Read => "READ",
            AclOperation::Write => "WRITE",
            AclOperation::Create => "CREATE",
            AclOperation::Delete => "DELETE",
            AclOperation::Alter => "ALTER",
            AclOperation::Describe => "DESCRIBE",
            AclOperation::ClusterAction => "CLUSTER_ACTION",
            AclOperation::DescribeConfigs => "DESCRIBE_CONFIGS",
            AclOperation::AlterConfigs => "ALTER_CONFIGS",
            AclOperation::IdempotentWrite => "IDEMPOTENT_WRITE",
        }
    }
}

/// ACL permission type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i8)]
pub enum AclPermissionType {
    Unspecified = 0,
    Any = 1,
    Deny = 2,
    Allow = 3,
}

impl AclPermissionType {
    pub fn from_i8(value: i8) -> Self {
        match value {
            1 => AclPermissionType::Any,
            2 => AclPermissionType::Deny,
            3 => AclPermissionType::Allow,
            _ => AclPermissionType::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AclPermissionType::Unspecified => "UNSPECIFIED",
            AclPermissionType::Any => "ANY",
            AclPermissionType::Deny => "DENY",
            AclPermissionType::Allow => "ALLOW",
        }
    }
}

/// One principal/host/operation entry attached to a resource in a list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclPolicy {
    pub principal: String,
    pub host: String,
    pub operation: AclOperation,
    pub permission_type: AclPermissionType,
}

/// Resource with its ACLs in a list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAcls {
    pub resource_type: ResourceType,
    pub resource_name: String,
    pub resource_pattern_type: PatternType,
    #[serde(default)]
    pub acls: Vec<AclPolicy>,
}

/// ListAcls response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAclsResponse {
    #[serde(default)]
    pub resources: Vec<ResourceAcls>,
}

/// Query for ListAcls. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAclsFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_pattern_type: Option<PatternType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<AclOperation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_type: Option<AclPermissionType>,
}

impl ListAclsFilter {
    /// Every binding of one principal, on any host.
    pub fn for_principal(principal: &str) -> Self {
        Self {
            principal: Some(principal.to_string()),
            ..Default::default()
        }
    }

    /// Every binding of one principal on one host.
    pub fn for_principal_host(principal: &str, host: &str) -> Self {
        Self {
            principal: Some(principal.to_string()),
            host: Some(host.to_string()),
            ..Default::default()
        }
    }
}

/// A single binding to create
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreateAclRequest {
    pub principal: String,
    pub resource_type: ResourceType,
    pub resource_name: String,
    pub resource_pattern_type: PatternType,
    pub host: String,
    pub operation: AclOperation,
    pub permission_type: AclPermissionType,
}

impl CreateAclRequest {
    pub fn identity(&self) -> AclIdentity {
        AclIdentity {
            principal: self.principal.clone(),
            host: self.host.clone(),
            resource_name: self.resource_name.clone(),
            resource_type: self.resource_type,
            resource_pattern_type: self.resource_pattern_type,
            operation: self.operation,
            permission_type: self.permission_type,
        }
    }
}

/// Exact-match filter deleting the binding a create request would have made
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAclsFilter {
    pub principal: String,
    pub resource_type: ResourceType,
    pub resource_name: String,
    pub resource_pattern_type: PatternType,
    pub host: String,
    pub operation: AclOperation,
    pub permission_type: AclPermissionType,
}

impl From<&CreateAclRequest> for DeleteAclsFilter {
    fn from(request: &CreateAclRequest) -> Self {
        Self {
            principal: request.principal.clone(),
            resource_type: request.resource_type,
            resource_name: request.resource_name.clone(),
            resource_pattern_type: request.resource_pattern_type,
            host: request.host.clone(),
            operation: request.operation,
            permission_type: request.permission_type,
        }
    }
}

/// Composite identity of one binding.
///
/// Two requests with equal identities describe the same binding, so the
/// identity is what diffing compares. Principal and host are part of it so
/// requests from different principal/host groups never collide.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AclIdentity {
    pub principal: String,
    pub host: String,
    pub resource_name: String,
    pub resource_type: ResourceType,
    pub resource_pattern_type: PatternType,
    pub operation: AclOperation,
    pub permission_type: AclPermissionType,
}

impl fmt::Display for AclIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}@{}/{}",
            self.resource_name,
            self.resource_type.as_str(),
            self.resource_pattern_type.as_str(),
            self.operation.as_str(),
            self.permission_type.as_str(),
            self.principal,
            self.host,
        )
    }
}
