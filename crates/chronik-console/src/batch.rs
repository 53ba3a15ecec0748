//! Concurrent submission of ACL create/delete batches.
//!
//! Every request in a batch is sent, failures are collected per request and
//! nothing that succeeded is rolled back.

use std::fmt;

use chronik_acl::{AclDifference, CreateAclRequest, DeleteAclsFilter};
use futures::future::Either;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::client::AclService;
use crate::error::ConsoleError;

/// Which half of a batch a request belonged to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyAction {
    Create,
    Delete,
}

impl fmt::Display for ApplyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyAction::Create => write!(f, "create"),
            ApplyAction::Delete => write!(f, "delete"),
        }
    }
}

/// A request that did not go through
#[derive(Debug)]
pub struct ApplyFailure {
    pub action: ApplyAction,
    pub request: CreateAclRequest,
    pub error: ConsoleError,
}

/// Overall outcome, mapped to the kind of notice shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    /// Some requests failed, the rest were applied.
    Warning,
    /// Nothing was applied.
    Error,
}

/// Result of applying one batch
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub created: Vec<CreateAclRequest>,
    pub deleted: Vec<CreateAclRequest>,
    pub failures: Vec<ApplyFailure>,
}

impl ApplyReport {
    pub fn succeeded(&self) -> usize {
        self.created.len() + self.deleted.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn severity(&self) -> Severity {
        if self.failures.is_empty() {
            Severity::Success
        } else if self.succeeded() > 0 {
            Severity::Warning
        } else {
            Severity::Error
        }
    }

    /// One-line summary for a toast.
    pub fn summary(&self) -> String {
        let applied = format!(
            "{} ACL(s) created, {} deleted",
            self.created.len(),
            self.deleted.len()
        );
        if self.failures.is_empty() {
            return applied;
        }

        let reasons: Vec<String> = self
            .failures
            .iter()
            .map(|f| format!("{} {}: {}", f.action, f.request.identity(), f.error))
            .collect();
        format!("{applied}; {} failed: {}", self.failures.len(), reasons.join("; "))
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: ApplyReport) {
        self.created.extend(other.created);
        self.deleted.extend(other.deleted);
        self.failures.extend(other.failures);
    }
}

/// Send every delete and create in `diff`, at most `max_in_flight` at a time.
///
/// A delete that matches no binding on the backend counts as a failure.
pub async fn apply_difference(
    service: &dyn AclService,
    diff: &AclDifference,
    max_in_flight: usize,
) -> ApplyReport {
    let deletes = diff.to_delete.iter().map(move |request| async move {
        let filter = DeleteAclsFilter::from(request);
        let result = match service.delete_acls(&filter).await {
            Ok(0) => Err(ConsoleError::NotFound(format!(
                "no ACL binding matched {}",
                request.identity()
            ))),
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        };
        (ApplyAction::Delete, request, result)
    });
    let creates = diff.to_create.iter().map(move |request| async move {
        let result = service.create_acl(request).await;
        (ApplyAction::Create, request, result)
    });

    let pending = deletes.map(Either::Left).chain(creates.map(Either::Right));
    let outcomes: Vec<_> = stream::iter(pending)
        .buffer_unordered(max_in_flight.max(1))
        .collect()
        .await;

    let mut report = ApplyReport::default();
    for (action, request, result) in outcomes {
        match (action, result) {
            (ApplyAction::Create, Ok(())) => report.created.push(request.clone()),
            (ApplyAction::Delete, Ok(())) => report.deleted.push(request.clone()),
            (action, Err(error)) => {
                warn!(%action, identity = %request.identity(), "ACL {action} failed: {error}");
                report.failures.push(ApplyFailure {
                    action,
                    request: request.clone(),
                    error,
                });
            }
        }
    }

    info!(
        created = report.created.len(),
        deleted = report.deleted.len(),
        failed = report.failures.len(),
        "Applied ACL batch"
    );
    report
}

/// Create every request, as for a brand new principal/host.
pub async fn create_all(
    service: &dyn AclService,
    requests: &[CreateAclRequest],
    max_in_flight: usize,
) -> ApplyReport {
    let diff = AclDifference {
        to_create: requests.to_vec(),
        to_delete: Vec::new(),
    };
    apply_difference(service, &diff, max_in_flight).await
}
