use async_trait::async_trait;
use reqwest::RequestBuilder;
use runtime_helpers_common::constants::{
    ACCOUNT_SID_KEY, AUTH_TOKEN_KEY, DEFAULT_SERVERLESS_API_URL, SERVERLESS_API_URL_KEY,
};
use runtime_helpers_common::validation::{
    validate_environment_sid, validate_service_sid, validate_variable_sid,
};
use runtime_helpers_common::{Environment, HelperError, Result, Service, Variable};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::{debug, error};

use super::{ApiError, ServerlessApi};

/// Credentials and endpoint for the Serverless REST API
#[derive(Clone)]
pub struct ClientConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub base_url: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            base_url: DEFAULT_SERVERLESS_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Read `ACCOUNT_SID`, `AUTH_TOKEN` and optionally `SERVERLESS_API_URL`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from a key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let account_sid =
            get(ACCOUNT_SID_KEY).ok_or_else(|| HelperError::MissingConfig(ACCOUNT_SID_KEY.to_string()))?;
        let auth_token =
            get(AUTH_TOKEN_KEY).ok_or_else(|| HelperError::MissingConfig(AUTH_TOKEN_KEY.to_string()))?;

        let config = Self::new(account_sid, auth_token);
        Ok(match get(SERVERLESS_API_URL_KEY) {
            Some(url) => config.with_base_url(url),
            None => config,
        })
    }
}

/// One page of a list response; the item array is keyed by resource name
#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(alias = "services", alias = "environments", alias = "variables")]
    items: Vec<T>,

    #[serde(default)]
    meta: PageMeta,
}

#[derive(Debug, Default, Deserialize)]
struct PageMeta {
    next_page_url: Option<String>,
}

/// Error payload returned by the REST API
#[derive(Debug, Deserialize)]
struct RemoteError {
    message: String,
}

/// REST client for the Serverless management API
#[derive(Debug, Clone)]
pub struct TwilioServerlessClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl From<ClientConfig> for TwilioServerlessClient {
    fn from(config: ClientConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

impl TwilioServerlessClient {
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn services_url(&self) -> String {
        format!("{}/Services", self.config.base_url)
    }

    fn environments_url(&self, service_sid: &str) -> std::result::Result<String, ApiError> {
        validate_service_sid(service_sid)?;
        Ok(format!("{}/{}/Environments", self.services_url(), service_sid))
    }

    fn variables_url(
        &self,
        service_sid: &str,
        environment_sid: &str,
    ) -> std::result::Result<String, ApiError> {
        validate_environment_sid(environment_sid)?;
        Ok(format!(
            "{}/{}/Variables",
            self.environments_url(service_sid)?,
            environment_sid
        ))
    }

    fn variable_url(
        &self,
        service_sid: &str,
        environment_sid: &str,
        variable_sid: &str,
    ) -> std::result::Result<String, ApiError> {
        validate_variable_sid(variable_sid)?;
        Ok(format!(
            "{}/{}",
            self.variables_url(service_sid, environment_sid)?,
            variable_sid
        ))
    }

    /// Authenticate and send a request, decoding a JSON body on success
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<T, ApiError> {
        let response = request
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<RemoteError>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            error!("Serverless API returned {}: {}", status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }

    /// Fetch every page of a list resource, following `meta.next_page_url`
    async fn list_all<T: DeserializeOwned>(
        &self,
        url: String,
    ) -> std::result::Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut next = Some(url);

        while let Some(url) = next.take() {
            debug!("GET {}", url);
            let page: Page<T> = self.send(self.http.get(&url)).await?;
            items.extend(page.items);
            next = page.meta.next_page_url.filter(|u| !u.is_empty());
        }

        Ok(items)
    }
}

#[async_trait]
impl ServerlessApi for TwilioServerlessClient {
    async fn list_services(&self) -> std::result::Result<Vec<Service>, ApiError> {
        self.list_all(self.services_url()).await
    }

    async fn list_environments(
        &self,
        service_sid: &str,
    ) -> std::result::Result<Vec<Environment>, ApiError> {
        self.list_all(self.environments_url(service_sid)?).await
    }

    async fn list_variables(
        &self,
        service_sid: &str,
        environment_sid: &str,
    ) -> std::result::Result<Vec<Variable>, ApiError> {
        self.list_all(self.variables_url(service_sid, environment_sid)?)
            .await
    }

    async fn create_variable(
        &self,
        service_sid: &str,
        environment_sid: &str,
        key: &str,
        value: &str,
    ) -> std::result::Result<Variable, ApiError> {
        let url = self.variables_url(service_sid, environment_sid)?;
        debug!("POST {} (create '{}')", url, key);
        self.send(self.http.post(&url).form(&[("Key", key), ("Value", value)]))
            .await
    }

    async fn update_variable(
        &self,
        service_sid: &str,
        environment_sid: &str,
        variable_sid: &str,
        value: &str,
    ) -> std::result::Result<Variable, ApiError> {
        let url = self.variable_url(service_sid, environment_sid, variable_sid)?;
        debug!("POST {} (update)", url);
        self.send(self.http.post(&url).form(&[("Value", value)]))
            .await
    }
}
