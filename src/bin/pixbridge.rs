use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use pixbridge::{Bridge, BridgeOpts, Term};

#[derive(Parser, Debug)]
#[command(name = "pixbridge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON command script and print its result.
    Run(RunArgs),
    /// Print the shape of an image file.
    Info(InfoArgs),
    /// List script commands and boundary functions.
    List,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Script JSON: an array of `["command", arg...]` entries.
    #[arg(long)]
    script: PathBuf,

    /// Bridge options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save the resulting image here when the script ends in `get_image` or `get_crop`.
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input image (PNG or JPEG).
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Info(args) => cmd_info(args),
        Command::List => {
            cmd_list();
            Ok(())
        }
    }
}

fn read_json(path: &Path, what: &str) -> anyhow::Result<serde_json::Value> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parse {what} JSON"))
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let opts = match &args.config {
        Some(path) => BridgeOpts::from_path(path)?,
        None => BridgeOpts::default(),
    };
    let bridge = Bridge::with_opts(opts)?;
    let script = pixbridge::script_from_json(&read_json(&args.script, "script")?)?;

    let result = bridge.run(&script)?;
    println!("{}", pixbridge::term_to_json(&result));

    if let Some(out) = &args.save {
        let handle = result_handle(&result)
            .context("--save needs a script that ends in get_image or get_crop")?;
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        bridge.try_call("save", &[handle, Term::string(out.to_string_lossy())])?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

/// The handle inside `{:ok, handle}`.
fn result_handle(result: &Term) -> Option<Term> {
    match result {
        Term::Tuple(items) if items.len() == 2 && items[0].is_atom("ok") => {
            matches!(items[1], Term::Resource(_)).then(|| items[1].clone())
        }
        _ => None,
    }
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let bridge = Bridge::new();
    let loaded = bridge.try_call("load", &[Term::string(args.in_path.to_string_lossy())])?;
    let handle = result_handle(&loaded).context("load did not return a handle")?;
    let Term::Resource(h) = handle else {
        anyhow::bail!("load did not return a handle");
    };
    let dims = bridge.image(&h)?.dims();
    let info = serde_json::json!({
        "width": dims.width,
        "height": dims.height,
        "depth": dims.depth,
        "spectrum": dims.spectrum,
    });
    println!("{info}");
    Ok(())
}

fn cmd_list() {
    println!("script commands:");
    for name in pixbridge::command_names() {
        if let Some(phase) = pixbridge::command_phase(name) {
            println!("  {name:<22} {phase:?}");
        }
    }
    println!("boundary functions:");
    for name in pixbridge::function_names() {
        println!("  {name}");
    }
}
