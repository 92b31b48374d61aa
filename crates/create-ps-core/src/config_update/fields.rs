//! Editable manifest fields and their input validation

use std::fmt;
use std::str::FromStr;
use url::Url;

/// A package.json field the `pkg-config` command can edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigField {
    Author,
    Repository,
    Keywords,
    Homepage,
    Funding,
    License,
    Bugs,
}

impl ConfigField {
    pub const ALL: [ConfigField; 7] = [
        ConfigField::Author,
        ConfigField::Repository,
        ConfigField::Keywords,
        ConfigField::Homepage,
        ConfigField::Funding,
        ConfigField::License,
        ConfigField::Bugs,
    ];

    /// Manifest key
    pub fn key(&self) -> &'static str {
        match self {
            ConfigField::Author => "author",
            ConfigField::Repository => "repository",
            ConfigField::Keywords => "keywords",
            ConfigField::Homepage => "homepage",
            ConfigField::Funding => "funding",
            ConfigField::License => "license",
            ConfigField::Bugs => "bugs",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfigField::Author => "Author",
            ConfigField::Repository => "Repository",
            ConfigField::Keywords => "Keywords",
            ConfigField::Homepage => "Homepage",
            ConfigField::Funding => "Funding",
            ConfigField::License => "License",
            ConfigField::Bugs => "Bugs",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ConfigField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigField::ALL
            .iter()
            .copied()
            .find(|f| f.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown field: {}", s))
    }
}

/// Schemes accepted for a repository URL on top of http(s)
const REPOSITORY_SCHEMES: &[&str] = &["git", "git+https", "git+ssh", "ssh"];

/// An absolute http(s) URL with a host
pub fn validate_url(input: &str) -> Result<Url, String> {
    let url = Url::parse(input.trim()).map_err(|e| format!("'{}' is not a valid URL: {}", input, e))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        "http" | "https" => Err(format!("'{}' has no host", input)),
        other => Err(format!("'{}' uses unsupported scheme '{}'", input, other)),
    }
}

/// Like [`validate_url`], also accepting git transport URLs
pub fn validate_repository_url(input: &str) -> Result<Url, String> {
    let url = Url::parse(input.trim()).map_err(|e| format!("'{}' is not a valid URL: {}", input, e))?;
    let scheme_ok = matches!(url.scheme(), "http" | "https") || REPOSITORY_SCHEMES.contains(&url.scheme());
    if scheme_ok && url.host_str().is_some() {
        Ok(url)
    } else {
        Err(format!("'{}' is not a repository URL", input))
    }
}

/// `local@domain.tld` with no whitespace
pub fn is_email(input: &str) -> bool {
    let input = input.trim();
    if input.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = input.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Comma-separated keywords, trimmed, empties dropped
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
