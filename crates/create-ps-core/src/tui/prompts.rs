//! Charm-style CLI prompts using cliclack

use crate::collab::{Choice, CommandRunner, Prompter};
use crate::config_update::{self, ConfigOutcome, ConfigUpdateOptions};
use crate::engine::{Collaborators, Engine, EngineOptions, Report, Selection};
use crate::error::{Error, Result as CoreResult};
use crate::features::{catalog, ConflictPolicy};
use crate::manifest::{ManifestEditor, ModuleSystem, MANIFEST_FILE};
use crate::product::ProductConfig;
use crate::runtime::{author_name, check_tool, ProcessRunner};
use crate::templates::HttpRemote;
use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Package name written into the manifest; falls back to the existing name
    pub package_name: Option<String>,

    /// Generate ECMAScript-module files and manifest fields
    pub esm: bool,

    /// Package directory (defaults to the current directory)
    pub directory: Option<PathBuf>,

    /// Abort instead of overwriting when existing files are kept
    pub abort_on_conflict: bool,

    /// Don't run `git init`
    pub skip_git: bool,

    /// Don't run `npm init -y` when package.json is missing
    pub skip_init: bool,

    /// Accept the recommended features without asking
    pub yes: bool,
}

/// CLI arguments for the pkg-config command
#[derive(Debug, Clone)]
pub struct PkgConfigArgs {
    pub directory: Option<PathBuf>,

    /// Show the pending changes and ask before writing
    pub confirm: bool,

    /// Run `npm pkg fix` after writing
    pub run_fix: bool,
}

impl Default for PkgConfigArgs {
    fn default() -> Self {
        Self {
            directory: None,
            confirm: true,
            run_fix: true,
        }
    }
}

/// [`Prompter`] rendering with cliclack
#[derive(Default)]
pub struct ClackPrompter {
    spinner: Option<cliclack::ProgressBar>,
}

impl ClackPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

/// cliclack reports Esc / Ctrl-C on a prompt as `Interrupted`
fn prompt_error(e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::Interrupted {
        Error::Cancelled
    } else {
        Error::io("<terminal>", e)
    }
}

impl Prompter for ClackPrompter {
    fn text(&mut self, message: &str, placeholder: &str, initial: &str) -> CoreResult<String> {
        let mut input = cliclack::input(message).required(false);
        if !placeholder.is_empty() {
            input = input.placeholder(placeholder);
        }
        if !initial.is_empty() {
            input = input.default_input(initial);
        }
        input.interact::<String>().map_err(prompt_error)
    }

    fn select(&mut self, message: &str, options: &[Choice]) -> CoreResult<String> {
        let mut select = cliclack::select(message);
        for choice in options {
            select = select.item(choice.value.clone(), &choice.label, &choice.hint);
        }
        select.interact().map_err(prompt_error)
    }

    fn multiselect(
        &mut self,
        message: &str,
        options: &[Choice],
        required: bool,
    ) -> CoreResult<Vec<String>> {
        let mut multi = cliclack::multiselect(message);
        for choice in options {
            multi = multi.item(choice.value.clone(), &choice.label, &choice.hint);
        }
        let initial: Vec<String> = options
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.value.clone())
            .collect();
        multi
            .initial_values(initial)
            .required(required)
            .interact()
            .map_err(prompt_error)
    }

    fn confirm(&mut self, message: &str, initial: bool) -> CoreResult<bool> {
        cliclack::confirm(message)
            .initial_value(initial)
            .interact()
            .map_err(prompt_error)
    }

    fn info(&mut self, message: &str) {
        let _ = cliclack::log::info(message);
    }

    fn warn(&mut self, message: &str) {
        let _ = cliclack::log::warning(message);
    }

    fn success(&mut self, message: &str) {
        let _ = cliclack::log::success(message);
    }

    fn error(&mut self, message: &str) {
        let _ = cliclack::log::error(message);
    }

    fn start_progress(&mut self, message: &str) {
        let spinner = cliclack::spinner();
        spinner.start(message);
        self.spinner = Some(spinner);
    }

    fn stop_progress(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.stop(message),
            None => self.info(message),
        }
    }
}

/// Run the create flow with interactive prompts
pub async fn run_create<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;
    let mut prompter = ClackPrompter::new();
    let runner = ProcessRunner::new(config.command_timeout());

    // Step 1: Resolve the package directory
    let dir = resolve_directory(args.directory.as_deref())?;

    // Step 2: Make sure a manifest exists
    let manifest_path = dir.join(MANIFEST_FILE);
    if !manifest_path.exists() && !args.skip_init {
        init_manifest(config, &dir, &runner, &mut prompter).await?;
    }
    let mut manifest = ManifestEditor::load(&manifest_path)
        .await
        .with_context(|| format!("Cannot scaffold without {}", manifest_path.display()))?;

    // Step 3: Collect the selection
    let module_system = ModuleSystem::from_esm_flag(args.esm);
    let package_name = args
        .package_name
        .clone()
        .or_else(|| manifest.name().map(str::to_string))
        .or_else(|| dir.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_default();
    cliclack::log::info(format!("Package: {} ({})", package_name, module_system))?;

    let description = if args.yes {
        String::new()
    } else {
        prompter.text("Enter a short description of the package:", "", "")?
    };
    let features = select_features(&mut prompter, args.yes)?;
    let selection = Selection::new(package_name.clone(), module_system)
        .description(description)
        .features(features);

    // Step 4: Materialize
    let remote = HttpRemote::from_config(config)?;
    let author = author_name(config.author_env(), config.vcs()).unwrap_or_default();
    let options = EngineOptions {
        author,
        today: chrono::Local::now().date_naive(),
        package_manager: config.package_manager().to_string(),
        conflict_policy: if args.abort_on_conflict {
            ConflictPolicy::AbortOnDecline
        } else {
            ConflictPolicy::SkipColliding
        },
        endpoints: remote.endpoints().clone(),
    };
    let report = {
        let mut engine = Engine::new(
            &dir,
            options,
            Collaborators {
                prompter: &mut prompter,
                templates: &remote,
                registry: &remote,
                runner: &runner,
            },
        );
        engine.materialize(&selection, &mut manifest).await?
    };

    if report.is_aborted() {
        cliclack::outro_cancel("Package creation aborted.")?;
        return Ok(());
    }

    // Step 5: Version control (never blocks scaffolding)
    if !args.skip_git && !dir.join(".git").exists() {
        init_repository(config, &dir, &runner, &mut prompter).await;
    }

    // Step 6: Summary
    print_report(&package_name, &report)?;
    Ok(())
}

/// Run the pkg-config flow with interactive prompts
pub async fn run_pkg_config<C: ProductConfig>(config: &C, args: PkgConfigArgs) -> Result<()> {
    cliclack::intro(format!("{} pkg-config", config.display_name()))?;
    let mut prompter = ClackPrompter::new();
    let runner = ProcessRunner::new(config.command_timeout());

    let dir = resolve_directory(args.directory.as_deref())?;
    let mut manifest = ManifestEditor::load_from_dir(&dir)
        .await
        .context("pkg-config needs an existing package.json")?;

    let fields = config_update::prompt_fields(&mut prompter)?;
    let options = ConfigUpdateOptions {
        confirm: args.confirm,
        run_fix: args.run_fix,
        package_manager: config.package_manager().to_string(),
        default_author: author_name(config.author_env(), config.vcs()),
    };

    match config_update::run(&mut manifest, &fields, &mut prompter, &runner, &options).await? {
        ConfigOutcome::NothingSelected => cliclack::outro("Nothing selected, package.json left unchanged.")?,
        ConfigOutcome::Declined => cliclack::outro("No changes were written.")?,
        ConfigOutcome::Updated { changes, .. } => cliclack::outro(format!(
            "Your package.json has been updated ({} field{}).",
            changes.len(),
            if changes.len() == 1 { "" } else { "s" }
        ))?,
    }

    Ok(())
}

fn resolve_directory(dir: Option<&Path>) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let path = match dir {
        Some(d) if d.is_absolute() => d.to_path_buf(),
        Some(d) => current_dir.join(d),
        None => current_dir,
    };

    if !path.is_dir() {
        anyhow::bail!("Directory does not exist: {}", path.display());
    }
    Ok(path)
}

async fn init_manifest<C: ProductConfig>(
    config: &C,
    dir: &Path,
    runner: &ProcessRunner,
    prompter: &mut ClackPrompter,
) -> Result<()> {
    let pm = config.package_manager();
    let tool = check_tool(pm);
    if !tool.available {
        cliclack::log::warning(format!("{} was not found on PATH", tool))?;
    }

    prompter.start_progress(&format!("Running {} init -y...", pm));
    let args = ["init".to_string(), "-y".to_string()];
    match runner.run(pm, &args, dir).await {
        Ok(out) if out.success => prompter.stop_progress("Created package.json"),
        Ok(out) => {
            prompter.stop_progress(&format!("{} init failed", pm));
            prompter.error(&out.summary());
        }
        Err(e) => {
            prompter.stop_progress(&format!("{} init failed", pm));
            prompter.error(&e.to_string());
        }
    }
    Ok(())
}

fn select_features(prompter: &mut ClackPrompter, yes: bool) -> CoreResult<Vec<String>> {
    let recommended = catalog::recommended();
    if yes {
        return Ok(recommended.iter().map(|k| k.as_str().to_string()).collect());
    }

    let options: Vec<Choice> = catalog::all()
        .iter()
        .map(|f| {
            Choice::new(f.key.as_str(), f.label)
                .hint(if f.recommended { "Recommended" } else { "" })
                .selected(f.recommended)
        })
        .collect();
    prompter.multiselect("Select what you'd like to include:", &options, true)
}

async fn init_repository<C: ProductConfig>(
    config: &C,
    dir: &Path,
    runner: &ProcessRunner,
    prompter: &mut ClackPrompter,
) {
    let vcs = config.vcs();
    let tool = check_tool(vcs);
    if !tool.available {
        prompter.warn(&format!("Skipping repository setup: {}", tool));
        return;
    }

    let args = ["init".to_string()];
    match runner.run(vcs, &args, dir).await {
        Ok(out) if out.success => prompter.success("Initialized a git repository"),
        Ok(out) => prompter.warn(&format!(
            "Could not initialize a git repository: {}",
            out.summary()
        )),
        Err(e) => prompter.warn(&format!("Could not initialize a git repository: {}", e)),
    }
}

fn print_report(package_name: &str, report: &Report) -> Result<()> {
    println!();
    print!("{}", report);
    println!();

    if report.is_success() {
        cliclack::outro(format!(
            "The package structure for '{}' has been created successfully.",
            package_name
        ))?;
    } else {
        let failed = report.failed().count();
        cliclack::outro(format!(
            "The package structure for '{}' was created with {} failed feature{}.",
            package_name,
            failed,
            if failed == 1 { "" } else { "s" }
        ))?;
    }
    Ok(())
}
