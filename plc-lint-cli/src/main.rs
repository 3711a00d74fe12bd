use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

// Import from plc-lint-core
use plc_lint_core::{
    BranchSource, EvaluationInput, LinkResolver, LintConfig, OutputFormat, RuleEngine, StaticBranchSource,
    StaticLinkResolver,
};

// Import CLI utilities
use plc_lint::{exitcodes, history, list_files, user_config_path, SkeletonSource};

#[derive(Parser)]
#[command(name = "plc-lint")]
#[command(about = "Check a Pipeline Components repository against the organization skeleton")]
struct Args {
    /// Path to the component repository
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use a local skeleton checkout instead of downloading it
    #[arg(long)]
    skeleton_path: Option<String>,

    /// Skeleton repository to download the archive from
    #[arg(long)]
    skeleton_url: Option<String>,

    /// Component name (default: the repository directory name)
    #[arg(long)]
    component_name: Option<String>,

    /// Report format: text, json, or yaml
    #[arg(short = 'f', long, default_value = "text")]
    format: String,

    /// Also write the report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not check links or query branch metadata
    #[arg(long)]
    offline: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("PLC_LINT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let args = Args::parse();
    std::process::exit(run(args));
}

fn run(args: Args) -> i32 {
    println!("🦀 plc-lint");

    let format = match args.format.parse::<OutputFormat>() {
        Ok(format) => format,
        Err(e) => {
            eprintln!("❌ {e}");
            return exitcodes::INVALID_PARAMETERS;
        }
    };

    // Check if project directory exists
    let project = match args.path.canonicalize() {
        Ok(path) if path.is_dir() => path,
        _ => {
            eprintln!("⚠️  Project directory not found at: {}", args.path.display());
            return exitcodes::TEMPORARY_FAILURE;
        }
    };

    let config = load_config(&args);
    let timeout = config.network.timeout_secs.map(Duration::from_secs);

    let project_name = project.file_name().and_then(|n| n.to_str()).map(str::to_string);
    let component_name = config
        .component_name
        .clone()
        .or_else(|| project_name.clone())
        .unwrap_or_default();
    println!("📄 Checking: {} ({})", project.display(), component_name);

    let files = match list_files(&project) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("❌ {e:#}");
            return exitcodes::TEMPORARY_FAILURE;
        }
    };

    let skeleton = match SkeletonSource::from_config(&config.skeleton).fetch(timeout) {
        Ok(skeleton) => skeleton,
        Err(e) => {
            eprintln!("❌ Could not load skeleton: {e:#}");
            return exitcodes::SERVICE_UNAVAILABLE;
        }
    };
    debug!("skeleton has {} entries", skeleton.len());

    let commits = history::commit_history(&project).unwrap_or_else(|e| {
        warn!("⚠️  {e:#}");
        None
    });
    let details = history::repository_details(&project).unwrap_or_else(|e| {
        warn!("⚠️  {e:#}");
        None
    });

    let (resolver, branches) = network_capabilities(&config, args.offline, timeout);
    let engine = RuleEngine::new_with_dependencies(config, resolver, branches);
    let report = engine.evaluate(EvaluationInput {
        project_name: project_name.as_deref(),
        component_name: &component_name,
        files: &files,
        skeleton: &skeleton,
        history: commits.as_ref(),
        details: details.as_ref(),
    })
    .stamped(Utc::now());

    match report.render(format) {
        Ok(rendered) => print!("{rendered}"),
        Err(e) => eprintln!("❌ {e:#}"),
    }

    if let Some(output) = &args.output {
        if let Err(e) = save_report(&report, output, format) {
            eprintln!("❌ {e:#}");
        }
    }

    let summary = report.summary();
    println!(
        "📊 {} passed, {} failed, {} skipped, {} errors",
        summary.pass, summary.fail, summary.skip, summary.error
    );
    exitcodes::for_report(&report)
}

/// Explicit `--config`, then the user config file, then defaults; CLI flags
/// override whatever was loaded
fn load_config(args: &Args) -> LintConfig {
    let user_config = user_config_path().filter(|p| p.exists());
    let path = args.config.clone().or(user_config);

    let mut config = LintConfig::load_with_fallback(path.as_deref());
    match &path {
        Some(path) => println!("📋 Loaded config from: {}", path.display()),
        None => println!("📋 Using default config"),
    }

    if let Some(local) = &args.skeleton_path {
        config.skeleton.local_path = Some(local.clone());
    }
    if let Some(remote) = &args.skeleton_url {
        config.skeleton.remote = remote.clone();
        config.skeleton.local_path = None;
    }
    if let Some(name) = &args.component_name {
        config.component_name = Some(name.clone());
    }
    config
}

#[cfg(feature = "http")]
fn network_capabilities(
    config: &LintConfig,
    offline: bool,
    timeout: Option<Duration>,
) -> (Box<dyn LinkResolver>, Box<dyn BranchSource>) {
    if offline {
        return offline_capabilities();
    }
    (
        Box::new(plc_lint_core::HttpLinkResolver::new(timeout)),
        Box::new(plc_lint_core::GitLabBranchSource::new(
            config.organization.api_url.clone(),
            timeout,
        )),
    )
}

/// Fallback when no HTTP client is compiled in
#[cfg(not(feature = "http"))]
fn network_capabilities(
    _config: &LintConfig,
    offline: bool,
    _timeout: Option<Duration>,
) -> (Box<dyn LinkResolver>, Box<dyn BranchSource>) {
    if !offline {
        warn!("⚠️  Built without the http feature, running offline");
    }
    offline_capabilities()
}

fn offline_capabilities() -> (Box<dyn LinkResolver>, Box<dyn BranchSource>) {
    (
        Box::new(StaticLinkResolver::offline()),
        Box::new(StaticBranchSource::new()),
    )
}

fn save_report(report: &plc_lint_core::LintReport, output: &Path, format: OutputFormat) -> Result<()> {
    report.save_with_format(output, format)?;
    println!("💾 Report saved to: {}", output.display());
    Ok(())
}
