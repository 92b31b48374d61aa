//! cps - scaffold the foundations of an npm package

use anyhow::Result;
use clap::{Parser, Subcommand};
use create_ps_core::tui::{CreateArgs, PkgConfigArgs};
use create_ps_core::{Error, ProductConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// create-ps product configuration
#[derive(Clone)]
pub struct CreatePsConfig;

impl ProductConfig for CreatePsConfig {
    fn name(&self) -> &'static str {
        "create-ps"
    }

    fn display_name(&self) -> &'static str {
        "create-ps"
    }
}

#[derive(Parser, Debug)]
#[command(name = "cps")]
#[command(about = "Scaffold the directory structure and metadata of an npm package")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub create: CliCreateArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Edit metadata fields of an existing package.json
    #[command(alias = "config-update")]
    PkgConfig(CliPkgConfigArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Package name written into package.json
    pub package_name: Option<String>,

    /// Generate ECMAScript modules (.mjs, "type": "module")
    #[arg(long, conflicts_with = "cjs")]
    pub esm: bool,

    /// Generate CommonJS modules (the default)
    #[arg(long)]
    pub cjs: bool,

    /// Package directory (defaults to the current directory)
    #[arg(short, long = "dir")]
    pub directory: Option<PathBuf>,

    /// Abort instead of overwriting when existing files are kept
    #[arg(long = "abort-on-conflict")]
    pub abort_on_conflict: bool,

    /// Don't run `git init`
    #[arg(long = "skip-git")]
    pub skip_git: bool,

    /// Don't run `npm init -y` when package.json is missing
    #[arg(long = "skip-init")]
    pub skip_init: bool,

    /// Accept the recommended features without asking (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            package_name: args.package_name,
            esm: args.esm,
            directory: args.directory,
            abort_on_conflict: args.abort_on_conflict,
            skip_git: args.skip_git,
            skip_init: args.skip_init,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliPkgConfigArgs {
    /// Package directory (defaults to the current directory)
    #[arg(short, long = "dir")]
    pub directory: Option<PathBuf>,

    /// Write without showing the pending changes first
    #[arg(long = "no-confirm")]
    pub no_confirm: bool,

    /// Don't run `npm pkg fix` after writing
    #[arg(long = "skip-fix")]
    pub skip_fix: bool,
}

impl From<CliPkgConfigArgs> for PkgConfigArgs {
    fn from(args: CliPkgConfigArgs) -> Self {
        PkgConfigArgs {
            directory: args.directory,
            confirm: !args.no_confirm,
            run_fix: !args.skip_fix,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    init_tracing();

    let args = Args::parse();
    let config = CreatePsConfig;

    let result = match args.command {
        Some(Command::PkgConfig(pkg_args)) => {
            create_ps_core::run_pkg_config(&config, pkg_args.into()).await
        }
        None => create_ps_core::run_create(&config, args.create.into()).await,
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    exit_code(result)
}

fn exit_code(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_cancelled(&e) => {
            println!("Operation cancelled.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = ?e, "run failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn is_cancelled(e: &anyhow::Error) -> bool {
    e.chain()
        .any(|cause| cause.downcast_ref::<Error>().is_some_and(Error::is_cancelled))
}
