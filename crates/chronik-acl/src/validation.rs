//! Checks that block submitting an incomplete ACL detail.

use std::fmt;

use crate::rule::{AclDetail, Mode, Principal, ResourceKind, SelectorType};
use crate::wire::{AclOperation, PatternType};
use crate::{AclModelError, Result};

/// A single problem found in an [`AclDetail`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    InvalidPrincipal(String),
    EmptyHost,
    NoRules,
    EmptySelector { rule_id: u32 },
    NoOperations { rule_id: u32 },
    WildcardOperation { rule_id: u32, operation: AclOperation },
    DuplicateSelector { rule_id: u32, other_rule_id: u32 },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::InvalidPrincipal(p) => {
                write!(f, "principal '{p}' must have the form Type:name")
            }
            ValidationIssue::EmptyHost => write!(f, "host must not be empty, use * for any host"),
            ValidationIssue::NoRules => write!(f, "at least one rule is required"),
            ValidationIssue::EmptySelector { rule_id } => {
                write!(f, "rule {rule_id}: resource name or prefix is required")
            }
            ValidationIssue::NoOperations { rule_id } => {
                write!(f, "rule {rule_id}: allow or deny at least one operation")
            }
            ValidationIssue::WildcardOperation { rule_id, operation } => {
                write!(f, "rule {rule_id}: operation {} cannot be granted", operation.as_str())
            }
            ValidationIssue::DuplicateSelector { rule_id, other_rule_id } => {
                write!(f, "rule {rule_id}: same resource as rule {other_rule_id}")
            }
        }
    }
}

/// Collect every issue in `detail`, in rule order.
pub fn validation_issues(detail: &AclDetail) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if detail.shared_config.principal.parse::<Principal>().is_err() {
        issues.push(ValidationIssue::InvalidPrincipal(detail.shared_config.principal.clone()));
    }
    if detail.shared_config.host.trim().is_empty() {
        issues.push(ValidationIssue::EmptyHost);
    }
    if detail.rules.is_empty() {
        issues.push(ValidationIssue::NoRules);
    }

    let mut selectors: Vec<(u32, (ResourceKind, PatternType, String))> = Vec::new();
    for rule in &detail.rules {
        let needs_value = rule.resource_kind != ResourceKind::Cluster
            && rule.selector_type != SelectorType::Any;
        if needs_value && rule.selector_value.trim().is_empty() {
            issues.push(ValidationIssue::EmptySelector { rule_id: rule.id });
        }

        if rule.mode() == Mode::Custom {
            let mut set = rule.set_operations().peekable();
            if set.peek().is_none() {
                issues.push(ValidationIssue::NoOperations { rule_id: rule.id });
            }
            for (operation, _) in set {
                if matches!(operation, AclOperation::Unspecified | AclOperation::Any) {
                    issues.push(ValidationIssue::WildcardOperation { rule_id: rule.id, operation });
                }
            }
        }

        // Compare selectors as they will be sent, so `Any` and a literal `*` collide.
        let key = (rule.resource_kind, rule.selector_type.to_wire(), rule.resource_name());
        if let Some((other, _)) = selectors.iter().find(|(_, k)| *k == key) {
            issues.push(ValidationIssue::DuplicateSelector {
                rule_id: rule.id,
                other_rule_id: *other,
            });
        } else {
            selectors.push((rule.id, key));
        }
    }

    issues
}

/// `Ok` if `detail` can be submitted.
pub fn validate_acl_detail(detail: &AclDetail) -> Result<()> {
    let issues = validation_issues(detail);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(AclModelError::Validation(issues))
    }
}
