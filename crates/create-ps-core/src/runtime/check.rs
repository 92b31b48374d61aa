//! Detection of the external tools the scaffolder shells out to

use std::fmt;
use std::process::Command;

/// Tool detection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub version: Option<String>,
    pub available: bool,
}

impl fmt::Display for ToolInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.version, self.available) {
            (Some(v), true) => write!(f, "{} ({})", self.name, v),
            (None, true) => write!(f, "{} (unknown version)", self.name),
            _ => write!(f, "{} (not installed)", self.name),
        }
    }
}

/// Check whether a program is on PATH by asking for its version
pub fn check_tool(program: &str) -> ToolInfo {
    let output = Command::new(program).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout)
                .lines()
                .next()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty());
            ToolInfo {
                name: program.to_string(),
                version,
                available: true,
            }
        }
        _ => ToolInfo {
            name: program.to_string(),
            version: None,
            available: false,
        },
    }
}

/// Copyright holder name: `env_override` if set, else `git config user.name`
pub fn author_name(env_override: &str, vcs: &str) -> Option<String> {
    if let Ok(name) = std::env::var(env_override) {
        let name = name.trim().to_string();
        if !name.is_empty() {
            return Some(name);
        }
    }

    Command::new(vcs)
        .args(["config", "user.name"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
