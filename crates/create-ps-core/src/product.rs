//! Product configuration trait for CLI binaries
//!
//! This trait defines the endpoints, programs and identity that a binary hands
//! to the scaffolding core. Every endpoint can be overridden through an
//! environment variable, which is how tests and mirrors point the tool
//! somewhere other than the public services.

use std::time::Duration;

/// Configuration trait for the scaffolding CLI
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command and user agent)
    fn name(&self) -> &'static str;

    /// Human-readable display name shown in the intro banner
    fn display_name(&self) -> &'static str;

    /// Endpoint listing the available licenses (`[{key, name}]`)
    fn license_api_url(&self) -> &'static str {
        "https://api.github.com/licenses"
    }

    /// Environment variable overriding [`ProductConfig::license_api_url`]
    fn license_api_env(&self) -> &'static str {
        "CPS_LICENSE_API_URL"
    }

    /// Raw `.gitignore` template
    fn gitignore_url(&self) -> &'static str {
        "https://raw.githubusercontent.com/github/gitignore/main/Node.gitignore"
    }

    fn gitignore_env(&self) -> &'static str {
        "CPS_GITIGNORE_URL"
    }

    /// Raw code of conduct template
    fn code_of_conduct_url(&self) -> &'static str {
        "https://www.contributor-covenant.org/version/2/0/code_of_conduct/code_of_conduct.md"
    }

    fn code_of_conduct_env(&self) -> &'static str {
        "CPS_COC_URL"
    }

    /// Package registry used to validate dependency specifiers
    fn registry_url(&self) -> &'static str {
        "https://registry.npmjs.org"
    }

    fn registry_env(&self) -> &'static str {
        "CPS_REGISTRY_URL"
    }

    /// Environment variable overriding the author name read from git
    fn author_env(&self) -> &'static str {
        "CPS_AUTHOR"
    }

    /// Package manager executable (init, install, pkg fix)
    fn package_manager(&self) -> &'static str {
        "npm"
    }

    /// Version control executable
    fn vcs(&self) -> &'static str {
        "git"
    }

    /// Upper bound on a single HTTP request
    fn request_timeout(&self) -> Duration {
        Duration::from_secs(30)
    }

    /// Upper bound on a single external command (install can be slow)
    fn command_timeout(&self) -> Duration {
        Duration::from_secs(120)
    }

    /// User agent string for HTTP requests (api.github.com rejects requests without one)
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
