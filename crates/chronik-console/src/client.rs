//! ACL endpoints of the admin API.

use std::time::Duration;

use async_trait::async_trait;
use chronik_acl::{CreateAclRequest, DeleteAclsFilter, ListAclsFilter, ListAclsResponse};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::AdminApiConfig;
use crate::error::{ConsoleError, Result};

/// Backend operations the ACL screens depend on.
#[async_trait]
pub trait AclService: Send + Sync {
    async fn list_acls(&self, filter: &ListAclsFilter) -> Result<ListAclsResponse>;

    async fn create_acl(&self, request: &CreateAclRequest) -> Result<()>;

    /// Returns how many bindings matched the filter and were removed.
    async fn delete_acls(&self, filter: &DeleteAclsFilter) -> Result<u32>;
}

/// HTTP client for the admin API ACL endpoints
pub struct AdminApiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MutationResponse {
    success: bool,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct DeleteAclsResponse {
    success: bool,
    #[serde(default)]
    matched: u32,
    #[serde(default)]
    message: String,
}

impl AdminApiClient {
    pub fn new(config: &AdminApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn acls_url(&self) -> String {
        format!("{}/api/v1/acls", self.base_url)
    }

    fn add_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("X-API-Key", key),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = self.add_auth(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConsoleError::AdminApi(format!("{what} failed with {status}: {body}")));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl AclService for AdminApiClient {
    async fn list_acls(&self, filter: &ListAclsFilter) -> Result<ListAclsResponse> {
        let url = self.acls_url();
        debug!(?filter, "List ACLs: {url}");
        self.send(self.http.get(&url).query(filter), "List ACLs").await
    }

    async fn create_acl(&self, request: &CreateAclRequest) -> Result<()> {
        let url = self.acls_url();
        debug!(identity = %request.identity(), "Create ACL: {url}");
        let resp: MutationResponse =
            self.send(self.http.post(&url).json(request), "Create ACL").await?;
        if !resp.success {
            return Err(ConsoleError::AdminApi(format!("Create ACL rejected: {}", resp.message)));
        }
        Ok(())
    }

    async fn delete_acls(&self, filter: &DeleteAclsFilter) -> Result<u32> {
        let url = self.acls_url();
        debug!(
            principal = %filter.principal,
            resource = %filter.resource_name,
            "Delete ACLs: {url}"
        );
        let resp: DeleteAclsResponse =
            self.send(self.http.delete(&url).json(filter), "Delete ACLs").await?;
        if !resp.success {
            return Err(ConsoleError::AdminApi(format!("Delete ACLs rejected: {}", resp.message)));
        }
        Ok(resp.matched)
    }
}
