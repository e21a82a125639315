use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "quizscene", version)]
struct Cli {
    /// Log debug output to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a scene against the component catalog.
    Validate(ValidateArgs),
    /// Validate and lint a component descriptor.
    ValidateComponent(ValidateComponentArgs),
    /// Render a scene as an SVG document.
    Render(RenderArgs),
    /// Extract a scene or component from generator output.
    Extract(ExtractArgs),
    /// List catalog components.
    Catalog(CatalogArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Extra directory of component descriptors.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Also check definition card images.
    #[arg(long)]
    strict: bool,
}

#[derive(Parser, Debug)]
struct ValidateComponentArgs {
    /// Input component JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    /// Extra directory of component descriptors.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Document width.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Document height.
    #[arg(long, default_value_t = 600.0)]
    height: f64,
}

#[derive(Parser, Debug)]
struct ExtractArgs {
    /// Text file holding the generator reply.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Document kind to extract.
    #[arg(long, value_enum, default_value_t = DocumentKind::Scene)]
    kind: DocumentKind,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CatalogArgs {
    /// Extra directory of component descriptors.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Only list this category.
    #[arg(long)]
    category: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DocumentKind {
    Scene,
    Component,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::ValidateComponent(args) => cmd_validate_component(args),
        Command::Render(args) => cmd_render(args),
        Command::Extract(args) => cmd_extract(args),
        Command::Catalog(args) => cmd_catalog(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = read_text(path)?;
    serde_json::from_str(&text).with_context(|| format!("parse JSON '{}'", path.display()))
}

fn load_registry(dir: Option<&Path>) -> anyhow::Result<quizscene::CatalogRegistry> {
    let mut registry = quizscene::CatalogRegistry::with_builtin()?;
    if let Some(dir) = dir {
        let n = registry
            .load_dir(dir)
            .with_context(|| format!("load catalog '{}'", dir.display()))?;
        tracing::debug!(count = n, dir = %dir.display(), "loaded components");
    }
    Ok(registry)
}

fn write_output(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("write '{}'", path.display()))
}

fn fail_with_report(what: &str, report: &quizscene::ValidationReport) -> anyhow::Result<()> {
    for message in report.messages() {
        eprintln!("{message}");
    }
    anyhow::bail!("{what} is invalid ({} issue(s))", report.issues().len())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let raw = read_json(&args.in_path)?;
    let registry = load_registry(args.catalog.as_deref())?;
    let policy = if args.strict {
        quizscene::ReferencePolicy::AllReferences
    } else {
        quizscene::ReferencePolicy::RoadSceneObjects
    };
    let report = quizscene::validate_scene_with_policy(&raw, &registry, policy);
    if !report.is_valid() {
        return fail_with_report("scene", &report);
    }
    println!("valid");
    Ok(())
}

fn cmd_validate_component(args: ValidateComponentArgs) -> anyhow::Result<()> {
    let raw = read_json(&args.in_path)?;
    let report = quizscene::validate_component(&raw);
    if !report.is_valid() {
        return fail_with_report("component", &report);
    }
    let descriptor: quizscene::ComponentDescriptor =
        serde_json::from_value(raw).with_context(|| "decode component")?;
    let issues = quizscene::lint_component(&descriptor);
    for issue in &issues {
        eprintln!("{}: {issue}", descriptor.id);
    }
    if issues.iter().any(quizscene::LintIssue::is_fatal) {
        anyhow::bail!("component '{}' does not render", descriptor.id);
    }
    println!("valid");
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let text = read_text(&args.in_path)?;
    let (scene, report) = quizscene::schema::decode_scene_lenient(&text)
        .with_context(|| format!("load scene '{}'", args.in_path.display()))?;
    for message in report.messages() {
        eprintln!("warning: {message}");
    }
    let registry = load_registry(args.catalog.as_deref())?;
    let options = quizscene::RenderOptions {
        width: args.width,
        height: args.height,
        ..quizscene::RenderOptions::default()
    };

    let rendered = quizscene::render_scene(&scene, &registry, &options);
    for id in &rendered.missing_components {
        eprintln!("missing component '{id}' drawn as placeholder");
    }
    write_output(&args.out, &rendered.to_svg_document(&options))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_extract(args: ExtractArgs) -> anyhow::Result<()> {
    let text = read_text(&args.in_path)?;
    let json = match args.kind {
        DocumentKind::Scene => {
            let scene = quizscene::generate::extract::parse_scene_response(&text)?;
            serde_json::to_string_pretty(&scene)?
        }
        DocumentKind::Component => {
            let component = quizscene::generate::extract::parse_component_response(&text)?;
            serde_json::to_string_pretty(&component)?
        }
    };
    match &args.out {
        Some(out) => {
            write_output(out, &format!("{json}\n"))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_catalog(args: CatalogArgs) -> anyhow::Result<()> {
    let registry = load_registry(args.catalog.as_deref())?;
    let category = args
        .category
        .as_deref()
        .map(|c| {
            quizscene::ComponentCategory::parse(c)
                .with_context(|| format!("unknown category '{c}'"))
        })
        .transpose()?;
    for d in registry.list() {
        if category.is_some_and(|c| c != d.category) {
            continue;
        }
        println!("{}\t{}\t{}", d.id, d.category, d.name);
    }
    Ok(())
}
