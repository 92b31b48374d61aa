//! File content for the scaffolded features

use crate::manifest::ModuleSystem;
use chrono::NaiveDate;

pub const TEST_FILE: &str = "\
// You should install a testing framework if you are including tests within your package. Some popular ones include:

// Jest: https://jestjs.io/docs/getting-started
// Mocha: https://mochajs.org/#getting-started
// Jasmine: https://jasmine.github.io/pages/getting_started.html
// AVA: https://github.com/avajs/ava?tab=readme-ov-file#usage
";

pub const EXAMPLE_FILE: &str = "// Show an example of how your package is used here.\n";

pub const LOCALE_FILE: &str = "{}\n";

pub const WORKFLOW_FILE: &str = "\
# You can include any type of workflow here,
# for example, CI/CD, publishing, making issues stale, and more.

# See the GitHub Workflow docs here: https://docs.github.com/en/actions/using-workflows.
";

pub const DEPENDABOT_FILE: &str = "\
version: 2
updates:
  - package-ecosystem: \"npm\"
    directory: \"/\"
    schedule:
      interval: \"daily\"
";

/// Used when the remote Node.gitignore template can't be fetched
pub const GITIGNORE_FALLBACK: &str = "node_modules/\n";

pub const CONTRIBUTING_FILE: &str = "\
# Contributing

Thank you for considering contributing to this project! Before you do, please read these guidelines.

## Submitting a Pull Request

To submit a pull request, follow these steps:

1. Fork the repository

2. Clone your forked repository to your local machine

3. Create a new branch for your changes

4. Make your changes

5. Commit your changes to the branch

6. Push your changes to your forked repository

7. Open a pull request on GitHub

<!-- Continue to list more guidelines which are specific to the package you are making. !-->
";

/// Inputs for templated content
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub package_name: &'a str,
    pub description: &'a str,
    pub module_system: ModuleSystem,
    pub date: NaiveDate,
    /// `contributing` is part of the effective selection
    pub include_contributing: bool,
    /// Display name of the license that was actually written, if any
    pub license_name: Option<&'a str>,
}

pub fn docs(ctx: &RenderContext<'_>) -> String {
    let name = ctx.package_name;
    format!(
        "<!-- NOTE: This is a template documentation file. Feel free to modify it according to what your package is. !-->\n\n\
         # {name} Documentation\n\n\
         Welcome to the documentation for the {name} package!\n\n\
         This documentation houses everything you will need to know about how to use {name} within your own projects.\n"
    )
}

pub fn changelog(ctx: &RenderContext<'_>) -> String {
    format!(
        "# Changelog\n\n## v1.0.0 ({})\n\n* Initial commit\n",
        ctx.date.format("%Y-%m-%d")
    )
}

pub fn readme(ctx: &RenderContext<'_>) -> String {
    let name = ctx.package_name;
    let mut out = format!("# {name}\n\n");

    let description = ctx.description.trim();
    if !description.is_empty() {
        out.push_str(description);
        out.push_str("\n\n");
    }

    out.push_str(&format!(
        "## Installation\n\n```bash\nnpm install {name}\n```\n\n"
    ));
    out.push_str(&format!(
        "## Usage\n\n```javascript\n{}\n\n// (code goes here)\n// If needed, you can also tweak your import statement, depending on your needs.\n```\n",
        import_statement(ctx.module_system, name)
    ));

    if ctx.include_contributing {
        out.push_str(
            "\n## Contributing\n\nContributions are welcome! Please read the [contributing guidelines](CONTRIBUTING.md) before opening a pull request.\n",
        );
    }

    if let Some(license) = ctx.license_name {
        out.push_str(&format!(
            "\n## License\n\nThis project is licensed under the [{license}](LICENSE).\n"
        ));
    }

    out
}

/// Best-effort identifier a package is usually bound to.
///
/// Strips a registry scope and version suffix and camel-cases the rest, so
/// `@scope/left-pad@1.3.0` becomes `leftPad`. Packages whose idiomatic binding
/// differs from their name (`lodash` as `_`) get the wrong guess.
pub fn binding_name(specifier: &str) -> String {
    let without_scope = match specifier.strip_prefix('@') {
        Some(rest) => rest.split_once('/').map(|(_, name)| name).unwrap_or(rest),
        None => specifier,
    };
    let bare = without_scope
        .split_once('@')
        .map(|(name, _)| name)
        .unwrap_or(without_scope);

    let mut out = String::with_capacity(bare.len());
    let mut upper_next = false;
    for ch in bare.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' {
            if upper_next && !out.is_empty() {
                out.push(ch.to_ascii_uppercase());
            } else {
                out.push(ch);
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }

    if out.is_empty() {
        return "pkg".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// `import x from 'pkg';` or `const x = require('pkg');`
pub fn import_statement(module_system: ModuleSystem, package: &str) -> String {
    let binding = binding_name(package);
    match module_system {
        ModuleSystem::Esm => format!("import {binding} from '{package}';"),
        ModuleSystem::CommonJs => format!("const {binding} = require('{package}');"),
    }
}

/// Fill the project-name placeholders used by remote templates
pub fn substitute_project_name(text: &str, name: &str) -> String {
    text.replace("{{name}}", name)
        .replace("[project]", name)
        .replace("[PROJECT NAME]", name)
}
