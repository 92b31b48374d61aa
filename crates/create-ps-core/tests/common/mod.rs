//! Scripted collaborators shared by the integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use create_ps_core::collab::{Choice, LicenseSummary, LicenseText};
use create_ps_core::engine::{Collaborators, DependencySpec, Engine, EngineOptions};
use create_ps_core::{
    CommandOutput, CommandRunner, ConflictPolicy, Error, ManifestEditor, Prompter, Registry,
    RemoteEndpoints, Report, Result, Selection, TemplateSource,
};
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;
use url::Url;

pub const GITIGNORE_URL: &str = "https://templates.test/Node.gitignore";
pub const COC_URL: &str = "https://templates.test/code_of_conduct.md";
pub const MIT_BODY: &str = "MIT License\n\nCopyright (c) [year] [fullname]\n";

/// Answers prompts from queues; an unexpected prompt fails the test
#[derive(Default)]
pub struct ScriptedPrompter {
    pub texts: VecDeque<String>,
    pub selects: VecDeque<String>,
    pub multiselects: VecDeque<Vec<String>>,
    pub confirms: VecDeque<bool>,
    /// `(message, initial)` of every text prompt, in order
    pub text_calls: Vec<(String, String)>,
    pub confirm_calls: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_text(mut self, answer: &str) -> Self {
        self.texts.push_back(answer.to_string());
        self
    }

    pub fn answer_select(mut self, answer: &str) -> Self {
        self.selects.push_back(answer.to_string());
        self
    }

    pub fn answer_multiselect(mut self, answers: &[&str]) -> Self {
        self.multiselects
            .push_back(answers.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn answer_confirm(mut self, answer: bool) -> Self {
        self.confirms.push_back(answer);
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn text(&mut self, message: &str, _placeholder: &str, initial: &str) -> Result<String> {
        self.text_calls
            .push((message.to_string(), initial.to_string()));
        Ok(self
            .texts
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected text prompt: {}", message)))
    }

    fn select(&mut self, message: &str, options: &[Choice]) -> Result<String> {
        let answer = self
            .selects
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected select prompt: {}", message));
        assert!(
            options.iter().any(|c| c.value == answer),
            "'{}' is not an option of '{}'",
            answer,
            message
        );
        Ok(answer)
    }

    fn multiselect(&mut self, message: &str, _options: &[Choice], _required: bool) -> Result<Vec<String>> {
        Ok(self
            .multiselects
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected multiselect prompt: {}", message)))
    }

    fn confirm(&mut self, message: &str, _initial: bool) -> Result<bool> {
        self.confirm_calls.push(message.to_string());
        Ok(self
            .confirms
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected confirm prompt: {}", message)))
    }

    fn info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn success(&mut self, _message: &str) {}

    fn error(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

/// Serves templates and licenses from memory; missing URLs behave as offline
#[derive(Default)]
pub struct FakeTemplates {
    pub templates: HashMap<String, String>,
}

impl FakeTemplates {
    pub fn online() -> Self {
        let mut templates = HashMap::new();
        templates.insert(
            GITIGNORE_URL.to_string(),
            "node_modules/\ndist/\n".to_string(),
        );
        templates.insert(
            COC_URL.to_string(),
            "# Code of Conduct for [project]\n".to_string(),
        );
        Self { templates }
    }

    pub fn offline() -> Self {
        Self::default()
    }
}

impl TemplateSource for FakeTemplates {
    async fn fetch_template(&self, url: &str) -> Result<String> {
        self.templates
            .get(url)
            .cloned()
            .ok_or_else(|| Error::network(url, "connection refused"))
    }

    async fn fetch_license_catalog(&self) -> Result<Vec<LicenseSummary>> {
        Ok(vec![
            LicenseSummary {
                key: "mit".to_string(),
                name: "MIT License".to_string(),
            },
            LicenseSummary {
                key: "apache-2.0".to_string(),
                name: "Apache License 2.0".to_string(),
            },
        ])
    }

    async fn fetch_license(&self, key: &str) -> Result<LicenseText> {
        match key {
            "mit" => Ok(LicenseText {
                key: "mit".to_string(),
                name: "MIT License".to_string(),
                body: MIT_BODY.to_string(),
            }),
            other => Err(Error::network(format!("https://licenses.test/{}", other), "not found")),
        }
    }
}

/// Registry that knows a fixed set of package names
#[derive(Default)]
pub struct FakeRegistry {
    pub known: HashSet<String>,
    pub lookups: Mutex<Vec<String>>,
}

impl FakeRegistry {
    pub fn with(names: &[&str]) -> Self {
        Self {
            known: names.iter().map(|n| n.to_string()).collect(),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

impl Registry for FakeRegistry {
    async fn exists(&self, spec: &DependencySpec) -> Result<bool> {
        self.lookups.lock().unwrap().push(spec.to_string());
        Ok(self.known.contains(&spec.name))
    }
}

/// Records commands; `npm install` adds the packages to package.json like npm does
pub struct FakeRunner {
    pub succeed: bool,
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeRunner {
    pub fn ok() -> Self {
        Self {
            succeed: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            succeed: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<CommandOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));

        if !self.succeed {
            return Ok(CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: "npm ERR! code E404\nnpm ERR! 404 Not Found\n".to_string(),
            });
        }

        if args.first().map(String::as_str) == Some("install") {
            let path = cwd.join("package.json");
            let mut manifest: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
            let deps: serde_json::Map<String, Value> = args[1..]
                .iter()
                .map(|a| (DependencySpec::parse(a).unwrap().name, Value::from("^1.0.0")))
                .collect();
            manifest["dependencies"] = Value::Object(deps);
            fs::write(&path, serde_json::to_string_pretty(&manifest).unwrap()).unwrap();
        }

        Ok(CommandOutput {
            success: true,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

/// Temp package directory holding a minimal package.json
pub fn package_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        "{\n  \"name\": \"my-lib\",\n  \"version\": \"1.0.0\",\n  \"main\": \"index.js\"\n}\n",
    )
    .unwrap();
    dir
}

pub fn read_manifest(dir: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(dir.join("package.json")).unwrap()).unwrap()
}

pub fn endpoints() -> RemoteEndpoints {
    RemoteEndpoints {
        license_api: Url::parse("https://licenses.test/licenses").unwrap(),
        gitignore: Url::parse(GITIGNORE_URL).unwrap(),
        code_of_conduct: Url::parse(COC_URL).unwrap(),
        registry: Url::parse("https://registry.test").unwrap(),
    }
}

pub fn options(policy: ConflictPolicy) -> EngineOptions {
    EngineOptions {
        author: "Ada Lovelace".to_string(),
        today: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        package_manager: "npm".to_string(),
        conflict_policy: policy,
        endpoints: endpoints(),
    }
}

/// Load the manifest from `dir` and run one scaffolding pass
pub async fn scaffold(
    dir: &Path,
    selection: &Selection,
    prompter: &mut ScriptedPrompter,
    templates: &FakeTemplates,
    registry: &FakeRegistry,
    runner: &FakeRunner,
    policy: ConflictPolicy,
) -> Result<Report> {
    let mut manifest = ManifestEditor::load_from_dir(dir).await?;
    let mut engine = Engine::new(
        dir,
        options(policy),
        Collaborators {
            prompter,
            templates,
            registry,
            runner,
        },
    );
    engine.materialize(selection, &mut manifest).await
}

/// Every path below `root` (files and directories), relative, excluding package.json
pub fn tree(root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .filter(|p| p != Path::new("package.json"))
        .collect();
    paths.sort();
    paths
}
