//! ACL rule model for the Chronik Stream console.
//!
//! The admin API speaks a flat list of bindings, one per
//! `(resource, principal, host, operation, permission)`. The console edits
//! them grouped by principal and host, one rule per resource selector. This
//! crate converts between the two and computes the minimal set of creates and
//! deletes an edit needs.

pub mod convert;
pub mod diff;
pub mod filter;
pub mod grouping;
pub mod rule;
pub mod validation;
pub mod wire;

pub use convert::rules_to_create_requests;
pub use diff::{
    calculate_acl_difference, calculate_binding_difference, calculate_detail_difference,
    AclDifference,
};
pub use filter::AclListFilter;
pub use grouping::{acl_details_from_list_response, bindings_from_list_response};
pub use rule::{
    AclDetail, Mode, OperationPermission, Principal, PrincipalType, ResourceKind, Rule,
    SelectorType, SharedConfig,
};
pub use validation::{validate_acl_detail, validation_issues, ValidationIssue};
pub use wire::{
    AclIdentity, AclOperation, AclPermissionType, AclPolicy, CreateAclRequest, DeleteAclsFilter,
    ListAclsFilter, ListAclsResponse, PatternType, ResourceAcls, ResourceType,
};

use thiserror::Error;

/// ACL model error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AclModelError {
    #[error("Invalid principal '{0}', expected Type:name")]
    InvalidPrincipal(String),

    #[error("Invalid ACL: {}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),
}

/// ACL model result
pub type Result<T> = std::result::Result<T, AclModelError>;

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
