use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use release_prep::annotate::{self, DocsExport};
use release_prep::config::{self, Config};
use release_prep::git::Git2Repository;
use release_prep::registry::CratesIoRegistry;
use release_prep::ui;
use release_prep::workflow::{self, PrepareArgs};

#[derive(Parser)]
#[command(
    name = "release-prep",
    about = "Prepare, publish, and annotate crate releases"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Bump the version, regenerate the changelog, and open a release PR
    Prepare {
        #[arg(help = "Exact version to release, or one of: major, minor, patch")]
        version: String,

        #[arg(long, help = "Preview the release without touching any state")]
        dry_run: bool,

        #[arg(long, help = "Issue link appended to the pull request body")]
        issue_url: Option<String>,
    },

    /// Publish the current manifest version and push the release tag
    Publish {
        #[arg(long, help = "Preview the publish without touching any state")]
        dry_run: bool,
    },

    /// Rewrite parameter records in a source tree from a docs export
    Annotate {
        #[arg(long, help = "Path to the JSON documentation export")]
        docs: Option<PathBuf>,

        #[arg(long, help = "Source directory to rewrite")]
        dir: Option<PathBuf>,

        #[arg(long, help = "Also inject default-value constants")]
        defaults: bool,

        #[arg(long, help = "Wrap defaulted parameter arrays in a shared static")]
        wrap: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Command::Prepare {
            version,
            dry_run,
            issue_url,
        } => run_prepare(&config, version, dry_run, issue_url),
        Command::Publish { dry_run } => run_publish(&config, dry_run),
        Command::Annotate {
            docs,
            dir,
            defaults,
            wrap,
        } => run_annotate(&config, docs, dir, defaults, wrap),
    };

    if let Err(e) = result {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }

    Ok(())
}

fn run_prepare(
    config: &Config,
    version: String,
    dry_run: bool,
    issue_url: Option<String>,
) -> release_prep::Result<()> {
    let repo = Git2Repository::discover(Path::new("."))?;
    let registry = CratesIoRegistry::new(&config.registry_url)?;
    let args = PrepareArgs {
        directive: version,
        dry_run,
        issue_url,
    };

    let outcome = workflow::run_prepare(config, &repo, &registry, &args)?;
    if !dry_run {
        ui::display_success(&format!(
            "Release {} prepared on branch {}",
            outcome.new_version, outcome.branch
        ));
    }
    Ok(())
}

fn run_publish(config: &Config, dry_run: bool) -> release_prep::Result<()> {
    let repo = Git2Repository::discover(Path::new("."))?;
    let registry = CratesIoRegistry::new(&config.registry_url)?;

    workflow::run_publish(config, &repo, &registry, dry_run)?;
    Ok(())
}

fn run_annotate(
    config: &Config,
    docs: Option<PathBuf>,
    dir: Option<PathBuf>,
    defaults: bool,
    wrap: bool,
) -> release_prep::Result<()> {
    let docs_path = docs.unwrap_or_else(|| config.annotate.docs_path.clone());
    let source_dir = dir.unwrap_or_else(|| config.annotate.source_dir.clone());

    ui::display_status(&format!("Loading docs from {}", docs_path.display()));
    let export = DocsExport::load(&docs_path)?;
    ui::display_status(&format!("Loaded {} documented functions", export.len()));

    let summary = annotate::annotate_tree(&export, &source_dir, defaults, wrap)?;
    ui::display_success(&format!(
        "Modified {} out of {} files",
        summary.modified, summary.total
    ));
    Ok(())
}
