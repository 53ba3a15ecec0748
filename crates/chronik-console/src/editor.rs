//! Create, update and remove flows of the ACL screens.

use std::sync::Arc;

use chronik_acl::{
    acl_details_from_list_response, bindings_from_list_response, calculate_acl_difference,
    calculate_binding_difference, calculate_detail_difference, validate_acl_detail, AclDetail,
    AclListFilter, CreateAclRequest, ListAclsFilter, SharedConfig,
};
use tracing::info;

use crate::batch::{apply_difference, create_all, ApplyReport};
use crate::client::{AclService, AdminApiClient};
use crate::config::ConsoleConfig;
use crate::error::Result;

/// Drives ACL edits against an [`AclService`]
pub struct AclEditor {
    service: Arc<dyn AclService>,
    max_in_flight: usize,
}

impl AclEditor {
    pub fn new(service: Arc<dyn AclService>, max_in_flight: usize) -> Self {
        Self {
            service,
            max_in_flight,
        }
    }

    /// Editor talking HTTP to the configured admin API.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self> {
        config.validate()?;
        let client = AdminApiClient::new(&config.admin)?;
        Ok(Self::new(Arc::new(client), config.apply.max_in_flight))
    }

    /// Every detail of the ACL list screen, narrowed by the search box.
    pub async fn list(&self, search: &str) -> Result<Vec<AclDetail>> {
        let response = self.service.list_acls(&ListAclsFilter::default()).await?;
        let details = acl_details_from_list_response(&response);
        let filter = AclListFilter::new(search).with_host(true);
        Ok(details.into_iter().filter(|d| filter.matches(d)).collect())
    }

    /// All details of one principal, one per host.
    pub async fn load(&self, principal: &str) -> Result<Vec<AclDetail>> {
        let response = self
            .service
            .list_acls(&ListAclsFilter::for_principal(principal))
            .await?;
        Ok(acl_details_from_list_response(&response)
            .into_iter()
            .filter(|d| d.shared_config.principal == principal)
            .collect())
    }

    /// Detail of one principal on one host, if it has any bindings.
    pub async fn load_host(&self, principal: &str, host: &str) -> Result<Option<AclDetail>> {
        Ok(self
            .load(principal)
            .await?
            .into_iter()
            .find(|d| d.shared_config.host == host))
    }

    /// Bindings the backend holds for `principal`, on `host` or on every host.
    async fn stored_bindings(
        &self,
        principal: &str,
        host: Option<&str>,
    ) -> Result<Vec<CreateAclRequest>> {
        let filter = match host {
            Some(host) => ListAclsFilter::for_principal_host(principal, host),
            None => ListAclsFilter::for_principal(principal),
        };
        let response = self.service.list_acls(&filter).await?;
        Ok(bindings_from_list_response(&response)
            .into_iter()
            .filter(|b| b.principal == principal && host.map_or(true, |h| b.host == h))
            .collect())
    }

    /// Create every binding of a new detail.
    pub async fn create(&self, detail: &AclDetail) -> Result<ApplyReport> {
        validate_acl_detail(detail)?;
        let requests = detail.to_create_requests();
        info!(
            principal = %detail.shared_config.principal,
            host = %detail.shared_config.host,
            bindings = requests.len(),
            "Creating ACLs"
        );
        Ok(create_all(self.service.as_ref(), &requests, self.max_in_flight).await)
    }

    /// Apply the changes turning `current` into `desired`.
    ///
    /// `current` only decides whether anything changed. Deletes come from the
    /// bindings the backend lists for its principal and host, so rules stored
    /// in another form than the editor sends are still replaced.
    pub async fn update(&self, current: &AclDetail, desired: &AclDetail) -> Result<ApplyReport> {
        validate_acl_detail(desired)?;
        if calculate_detail_difference(current, desired).is_empty() {
            info!(principal = %desired.shared_config.principal, "ACLs unchanged");
            return Ok(ApplyReport::default());
        }

        let stored = self
            .stored_bindings(
                &current.shared_config.principal,
                Some(current.shared_config.host.as_str()),
            )
            .await?;
        let diff = calculate_binding_difference(&stored, desired);
        info!(
            principal = %desired.shared_config.principal,
            host = %desired.shared_config.host,
            to_create = diff.to_create.len(),
            to_delete = diff.to_delete.len(),
            "Updating ACLs"
        );
        Ok(apply_difference(self.service.as_ref(), &diff, self.max_in_flight).await)
    }

    /// Delete every stored binding of the detail's principal on its host.
    pub async fn remove(&self, detail: &AclDetail) -> Result<ApplyReport> {
        let SharedConfig { principal, host } = &detail.shared_config;
        let stored = self.stored_bindings(principal, Some(host.as_str())).await?;
        info!(%principal, %host, bindings = stored.len(), "Removing ACLs");
        Ok(self.delete_all(stored).await)
    }

    /// Delete every stored binding of `principal` on every host.
    pub async fn remove_principal(&self, principal: &str) -> Result<ApplyReport> {
        let stored = self.stored_bindings(principal, None).await?;
        info!(%principal, bindings = stored.len(), "Removing all ACLs of principal");
        Ok(self.delete_all(stored).await)
    }

    async fn delete_all(&self, bindings: Vec<CreateAclRequest>) -> ApplyReport {
        let diff = calculate_acl_difference(&bindings, &[]);
        apply_difference(self.service.as_ref(), &diff, self.max_in_flight).await
    }
}
