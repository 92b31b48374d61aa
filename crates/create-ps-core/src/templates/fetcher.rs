//! Remote templates, license texts and registry lookups over HTTP
//!
//! Every endpoint comes from the product config and can be overridden with an
//! environment variable, so mirrors and local test servers work the same way
//! as the public services.

use crate::collab::{LicenseSummary, LicenseText, Registry, TemplateSource};
use crate::engine::DependencySpec;
use crate::error::{Error, Result};
use crate::features::RemoteTemplate;
use crate::product::ProductConfig;
use anyhow::Context;
use semver::{Version, VersionReq};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Resolved remote endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoints {
    pub license_api: Url,
    pub gitignore: Url,
    pub code_of_conduct: Url,
    pub registry: Url,
}

impl RemoteEndpoints {
    /// Read the endpoints from a product config, honoring env overrides
    pub fn from_config<C: ProductConfig>(config: &C) -> anyhow::Result<Self> {
        Ok(Self {
            license_api: endpoint(config.license_api_env(), config.license_api_url())?,
            gitignore: endpoint(config.gitignore_env(), config.gitignore_url())?,
            code_of_conduct: endpoint(config.code_of_conduct_env(), config.code_of_conduct_url())?,
            registry: endpoint(config.registry_env(), config.registry_url())?,
        })
    }

    pub fn template_url(&self, template: RemoteTemplate) -> &str {
        match template {
            RemoteTemplate::Gitignore => self.gitignore.as_str(),
            RemoteTemplate::CodeOfConduct => self.code_of_conduct.as_str(),
        }
    }
}

fn endpoint(env: &str, default: &str) -> anyhow::Result<Url> {
    let url_str = std::env::var(env).unwrap_or_else(|_| default.to_string());
    Url::parse(&url_str).with_context(|| format!("Invalid URL in {}: {}", env, url_str))
}

/// Subset of a registry packument needed to check versions
#[derive(Debug, Default, Deserialize)]
struct Packument {
    #[serde(default)]
    versions: HashMap<String, serde_json::Value>,
    #[serde(default, rename = "dist-tags")]
    dist_tags: HashMap<String, String>,
}

impl Packument {
    /// A version is satisfied by a dist-tag, an exact published version, or a
    /// semver range any published version matches
    fn satisfies(&self, wanted: &str) -> bool {
        if self.dist_tags.contains_key(wanted) || self.versions.contains_key(wanted) {
            return true;
        }
        let Ok(req) = VersionReq::parse(wanted) else {
            return false;
        };
        self.versions
            .keys()
            .filter_map(|v| Version::parse(v).ok())
            .any(|v| req.matches(&v))
    }
}

/// HTTP client for templates, licenses and the package registry
pub struct HttpRemote {
    client: reqwest::Client,
    endpoints: RemoteEndpoints,
}

impl HttpRemote {
    pub fn new(endpoints: RemoteEndpoints, user_agent: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            endpoints,
        }
    }

    /// Create a client from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> anyhow::Result<Self> {
        let endpoints = RemoteEndpoints::from_config(config)?;
        Ok(Self::new(
            endpoints,
            config.user_agent(),
            config.request_timeout(),
        ))
    }

    pub fn endpoints(&self) -> &RemoteEndpoints {
        &self.endpoints
    }

    /// Build a URL by appending a path segment, preserving query parameters
    fn build_url(base: &Url, path_segment: &str) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::network(base.as_str(), "URL cannot have path segments"))?
            .pop_if_empty()
            .push(path_segment);
        Ok(url)
    }

    async fn get(&self, url: Url, accept: &str) -> Result<reqwest::Response> {
        self.client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, accept)
            .send()
            .await
            .map_err(|e| Error::network(url.as_str(), e))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, accept: &str) -> Result<T> {
        let response = self.get(url.clone(), accept).await?;
        if !response.status().is_success() {
            return Err(Error::network(
                url.as_str(),
                format!("HTTP {}", response.status()),
            ));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| Error::network(url.as_str(), e))
    }
}

impl TemplateSource for HttpRemote {
    async fn fetch_template(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url).map_err(|e| Error::network(url, e))?;
        let response = self.get(parsed, "text/plain, */*").await?;
        if !response.status().is_success() {
            return Err(Error::network(url, format!("HTTP {}", response.status())));
        }
        response.text().await.map_err(|e| Error::network(url, e))
    }

    async fn fetch_license_catalog(&self) -> Result<Vec<LicenseSummary>> {
        self.get_json(
            self.endpoints.license_api.clone(),
            "application/vnd.github+json",
        )
        .await
    }

    async fn fetch_license(&self, key: &str) -> Result<LicenseText> {
        let url = Self::build_url(&self.endpoints.license_api, key)?;
        self.get_json(url, "application/vnd.github+json").await
    }
}

impl Registry for HttpRemote {
    async fn exists(&self, spec: &DependencySpec) -> Result<bool> {
        // Scoped names keep their '/' encoded as %2F, which is what the registry expects
        let url = Self::build_url(&self.endpoints.registry, &spec.name)?;
        let response = self
            .get(url.clone(), "application/vnd.npm.install-v1+json")
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !response.status().is_success() {
            return Err(Error::network(
                url.as_str(),
                format!("HTTP {}", response.status()),
            ));
        }

        let Some(version) = &spec.version else {
            return Ok(true);
        };
        let packument: Packument = response
            .json()
            .await
            .map_err(|e| Error::network(url.as_str(), e))?;
        Ok(packument.satisfies(version))
    }
}
