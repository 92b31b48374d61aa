//! Static registry of the features a package can be scaffolded with

use crate::manifest::ModuleSystem;
use crate::templates::render::{self, RenderContext};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Stable identity of a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKey {
    Src,
    Test,
    Examples,
    Docs,
    Assets,
    I18n,
    Workflows,
    Dependabot,
    Gitignore,
    Readme,
    Contributing,
    Changelog,
    CodeOfConduct,
    License,
    Dependencies,
}

impl FeatureKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKey::Src => "src",
            FeatureKey::Test => "test",
            FeatureKey::Examples => "examples",
            FeatureKey::Docs => "docs",
            FeatureKey::Assets => "assets",
            FeatureKey::I18n => "i18n",
            FeatureKey::Workflows => "workflows",
            FeatureKey::Dependabot => "dependabot",
            FeatureKey::Gitignore => "gitignore",
            FeatureKey::Readme => "readme",
            FeatureKey::Contributing => "contributing",
            FeatureKey::Changelog => "changelog",
            FeatureKey::CodeOfConduct => "code_of_conduct",
            FeatureKey::License => "license",
            FeatureKey::Dependencies => "dependencies",
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKey {
    type Err = String;

    /// Accepts the feature key as well as the path-style toggle values
    /// (`src/`, `README.md`, `.github/workflows`, ...) older selections used.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.trim() {
            "src" | "src/" => FeatureKey::Src,
            "test" | "test/" | "tests" => FeatureKey::Test,
            "examples" | "examples/" => FeatureKey::Examples,
            "docs" | "docs/" => FeatureKey::Docs,
            "assets" | "assets/" => FeatureKey::Assets,
            "i18n" | "i18n/" => FeatureKey::I18n,
            "workflows" | ".github/workflows" => FeatureKey::Workflows,
            "dependabot" | ".github/dependabot.yml" => FeatureKey::Dependabot,
            "gitignore" | ".gitignore" => FeatureKey::Gitignore,
            "readme" | "README.md" => FeatureKey::Readme,
            "contributing" | "CONTRIBUTING.md" => FeatureKey::Contributing,
            "changelog" | "CHANGELOG.md" => FeatureKey::Changelog,
            "code_of_conduct" | "CODE_OF_CONDUCT.md" => FeatureKey::CodeOfConduct,
            "license" | "LICENSE" => FeatureKey::License,
            "dependencies" | "deps" => FeatureKey::Dependencies,
            other => return Err(format!("Unknown feature: {}", other)),
        };
        Ok(key)
    }
}

/// A path a feature produces, relative to the target directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Directory that is created but left empty
    Dir(&'static str),
    /// File with a fixed name
    File(&'static str),
    /// Script whose extension follows the module system (`.mjs` / `.js`)
    Script(&'static str),
}

impl Output {
    pub fn path(&self, module_system: ModuleSystem) -> PathBuf {
        match self {
            Output::Dir(p) | Output::File(p) => PathBuf::from(p),
            Output::Script(stem) => {
                PathBuf::from(format!("{}.{}", stem, module_system.script_extension()))
            }
        }
    }
}

/// Where a feature's content comes from
#[derive(Clone, Copy)]
pub enum ContentSource {
    /// Directories only, no file content
    Directory,
    /// Fixed text
    Static(&'static str),
    /// Text built from the selection and the outcome of earlier features
    Templated(fn(&RenderContext<'_>) -> String),
    /// Text fetched from a remote endpoint, with an optional offline fallback
    Remote {
        template: RemoteTemplate,
        fallback: Option<&'static str>,
    },
    /// Empty entry file plus the manifest entry-point mutation
    EntryPoint,
    /// Interactive license pick, fetched text with placeholders filled
    License,
    /// Validated install of user-supplied dependency specifiers
    Dependencies,
}

impl fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::Directory => f.write_str("Directory"),
            ContentSource::Static(_) => f.write_str("Static"),
            ContentSource::Templated(_) => f.write_str("Templated"),
            ContentSource::Remote { template, .. } => write!(f, "Remote({:?})", template),
            ContentSource::EntryPoint => f.write_str("EntryPoint"),
            ContentSource::License => f.write_str("License"),
            ContentSource::Dependencies => f.write_str("Dependencies"),
        }
    }
}

/// Remote templates the catalog knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteTemplate {
    Gitignore,
    CodeOfConduct,
}

#[derive(Debug)]
pub struct FeatureDefinition {
    pub key: FeatureKey,
    pub label: &'static str,
    /// Pre-selected in the feature picker
    pub recommended: bool,
    pub outputs: &'static [Output],
    /// Path checked for existing content before writing
    pub conflict_root: Option<Output>,
    pub content: ContentSource,
    pub needs_network: bool,
    /// Prompts the user while materializing
    pub needs_input: bool,
    /// Features whose presence or outcome changes this feature's content
    pub content_depends_on: &'static [FeatureKey],
}

impl FeatureDefinition {
    /// Output paths for a given module system
    pub fn output_paths(&self, module_system: ModuleSystem) -> Vec<PathBuf> {
        self.outputs
            .iter()
            .map(|o| o.path(module_system))
            .collect()
    }

    pub fn conflict_path(&self, module_system: ModuleSystem) -> Option<PathBuf> {
        self.conflict_root.map(|o| o.path(module_system))
    }
}

static CATALOG: [FeatureDefinition; 15] = [
    FeatureDefinition {
        key: FeatureKey::Src,
        label: "Source",
        recommended: true,
        outputs: &[Output::Script("src/index")],
        conflict_root: Some(Output::Dir("src")),
        content: ContentSource::EntryPoint,
        needs_network: false,
        needs_input: false,
        content_depends_on: &[],
    },
    FeatureDefinition {
        key: FeatureKey::Test,
        label: "Test",
        recommended: false,
        outputs: &[Output::File("test/example.test.js")],
        conflict_root: Some(Output::Dir("test")),
        content: ContentSource::Static(render::TEST_FILE),
        needs_network: false,
        needs_input: false,
        content_depends_on: &[],
    },
    FeatureDefinition {
        key: FeatureKey::Examples,
        label: "Examples",
        recommended: false,
        outputs: &[Output::Script("examples/example")],
        conflict_root: Some(Output::Dir("examples")),
        content: ContentSource::Static(render::EXAMPLE_FILE),
        needs_network: false,
        needs_input: false,
        content_depends_on: &[],
    },
    FeatureDefinition {
        key: FeatureKey::Docs,
        label: "Documentation",
        recommended: false,
        outputs: &[Output::File("docs/example.md")],
        conflict_root: Some(Output::Dir("docs")),
        content: ContentSource::Templated(render::docs),
        needs_network: false,
        needs_input: false,
        content_depends_on: &[],
    },
    FeatureDefinition {
        key: FeatureKey::Assets,
        label: "Assets / Images",
        recommended: false,
        outputs: &[Output::Dir("assets")],
        conflict_root: Some(Output::Dir("assets")),
        content: ContentSource::Directory,
        needs_network: false,
        needs_input: false,
        content_depends_on: &[],
    },
    FeatureDefinition {
        key: FeatureKey::I18n,
        label: "Internationalization (i18n)",
        recommended: false,
        outputs: &[Output::File("i18n/locales/en_US.json")],
        conflict_root: Some(Output::Dir("i18n")),
        content: ContentSource::Static(render::LOCALE_FILE),
        needs_network: false,
        needs_input: false,
        content_depends_on: &[],
    },
    FeatureDefinition {
        key: FeatureKey::Workflows,
        label: "GitHub workflows",
        recommended: false,
        outputs: &[Output::File(".github/workflows/workflow.yml")],
        conflict_root: Some(Output::Dir(".github/workflows")),
        content: ContentSource::Static(render::WORKFLOW_FILE),
        needs_network: false,
        needs_input: false,
        content_depends_on: &[],
    },
    FeatureDefinition {
        key: FeatureKey::Dependabot,
        label: "Dependabot configuration",
        recommended: true,
        outputs: &[Output::File(".github/dependabot.yml")],
        conflict_root: Some(Output::File(".github/dependabot.yml")),
        content: ContentSource::Static(render::DEPENDABOT_FILE),
        needs_network: false,
        needs_input: false,
        content_depends_on: &[],
    },
    FeatureDefinition {
        key: FeatureKey::Gitignore,
        label: "Gitignore",
        recommended: true,
        outputs: &[Output::File(".gitignore")],
        conflict_root: Some(Output::File(".gitignore")),
        content: ContentSource::Remote {
            template: RemoteTemplate::Gitignore,
            fallback: Some(render::GITIGNORE_FALLBACK),
        },
        needs_network: true,
        needs_input: false,
        content_depends_on: &[],
    },
    FeatureDefinition {
        key: FeatureKey::Readme,
        label: "Readme",
        recommended: true,
        outputs: &[Output::File("README.md")],
        conflict_root: Some(Output::File("README.md")),
        content: ContentSource::Templated(render::readme),
        needs_network: false,
        needs_input: false,
        content_depends_on: &[FeatureKey::Contributing, FeatureKey::License],
    },
    FeatureDefinition {
        key: FeatureKey::Contributing,
        label: "Contributing guidelines",
        recommended: false,
        outputs: &[Output::File("CONTRIBUTING.md")],
        conflict_root: Some(Output::File("CONTRIBUTING.md")),
        content: ContentSource::Static(render::CONTRIBUTING_FILE),
        needs_network: false,
        needs_input: false,
        content_depends_on: &[],
    },
    FeatureDefinition {
        key: FeatureKey::Changelog,
        label: "Changelog",
        recommended: false,
        outputs: &[Output::File("CHANGELOG.md")],
        conflict_root: Some(Output::File("CHANGELOG.md")),
        content: ContentSource::Templated(render::changelog),
        needs_network: false,
        needs_input: false,
        content_depends_on: &[],
    },
    FeatureDefinition {
        key: FeatureKey::CodeOfConduct,
        label: "Code of Conduct",
        recommended: false,
        outputs: &[Output::File("CODE_OF_CONDUCT.md")],
        conflict_root: Some(Output::File("CODE_OF_CONDUCT.md")),
        content: ContentSource::Remote {
            template: RemoteTemplate::CodeOfConduct,
            fallback: None,
        },
        needs_network: true,
        needs_input: false,
        content_depends_on: &[],
    },
    FeatureDefinition {
        key: FeatureKey::License,
        label: "License",
        recommended: true,
        outputs: &[Output::File("LICENSE")],
        conflict_root: Some(Output::File("LICENSE")),
        content: ContentSource::License,
        needs_network: true,
        needs_input: true,
        content_depends_on: &[],
    },
    FeatureDefinition {
        key: FeatureKey::Dependencies,
        label: "Dependencies",
        recommended: false,
        outputs: &[],
        conflict_root: None,
        content: ContentSource::Dependencies,
        needs_network: true,
        needs_input: true,
        content_depends_on: &[FeatureKey::Src],
    },
];

/// All features in display order
pub fn all() -> &'static [FeatureDefinition] {
    &CATALOG
}

/// Look up a feature by key
pub fn resolve(key: FeatureKey) -> &'static FeatureDefinition {
    // CATALOG is declared in FeatureKey order
    &CATALOG[key as usize]
}

/// Look up a feature by its string form; `None` for keys the catalog doesn't know
pub fn lookup(key: &str) -> Option<&'static FeatureDefinition> {
    key.parse::<FeatureKey>().ok().map(resolve)
}

/// Keys of the recommended features, used as the default selection
pub fn recommended() -> Vec<FeatureKey> {
    CATALOG
        .iter()
        .filter(|f| f.recommended)
        .map(|f| f.key)
        .collect()
}
