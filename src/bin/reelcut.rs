use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[derive(Parser, Debug)]
#[command(name = "reelcut", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile tracks into a render-engine cut list (JSON).
    CutList(CutListArgs),
    /// Export an episode as an OpenTimelineIO document.
    Otio(OtioArgs),
    /// Convert between seconds and ISO-8601 duration text.
    Duration(DurationArgs),
}

#[derive(Parser, Debug)]
struct CutListArgs {
    /// Physical clips JSON (`[{ "sourcePath", "durationSeconds" }]`), in timeline order.
    #[arg(long)]
    clips: PathBuf,

    /// Tracks JSON (`[{ "startSeconds", "endSeconds" }]`).
    #[arg(long)]
    tracks: PathBuf,

    /// Compiler config JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct OtioArgs {
    /// Physical clips JSON, in timeline order.
    #[arg(long)]
    clips: PathBuf,

    /// Episode JSON (`{ "title", "description", "tracks": [{ "start", "end" }] }`).
    #[arg(long)]
    episode: PathBuf,

    /// Compiler config JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the `.otio` file is written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct DurationArgs {
    /// Seconds (e.g. `3723.5`) or duration text (e.g. `PT1H2M3.5S`).
    #[arg(allow_hyphen_values = true)]
    value: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "reelcut=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::CutList(args) => cmd_cut_list(args),
        Command::Otio(args) => cmd_otio(args),
        Command::Duration(args) => cmd_duration(args),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {what} JSON '{}'", path.display()))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<reelcut::CompilerConfig> {
    match path {
        Some(p) => reelcut::CompilerConfig::from_path(p)
            .with_context(|| format!("load compiler config '{}'", p.display())),
        None => Ok(reelcut::CompilerConfig::default()),
    }
}

fn load_timeline(path: &Path) -> anyhow::Result<reelcut::Timeline> {
    let clips: Vec<reelcut::PhysicalClip> = read_json(path, "clips")?;
    reelcut::Timeline::new(clips).with_context(|| format!("lay out clips '{}'", path.display()))
}

fn write_output(out: &Path, body: &str) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, body).with_context(|| format!("write '{}'", out.display()))
}

fn cmd_cut_list(args: CutListArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let timeline = load_timeline(&args.clips)?;
    let tracks: Vec<reelcut::Track> = read_json(&args.tracks, "tracks")?;

    let cut = reelcut::build_cut_list(&timeline, &tracks, &cfg)?;
    let body = cut.to_json_pretty()?;
    tracing::info!(
        fingerprint = %reelcut::fingerprint_cut_list(&cut),
        output_frames = cut.output_len_frames()?,
        "compiled cut list"
    );

    match args.out {
        Some(out) => {
            write_output(&out, &body)?;
            eprintln!("wrote {}", out.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{body}").context("write cut list to stdout")?;
        }
    }
    Ok(())
}

fn cmd_otio(args: OtioArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let timeline = load_timeline(&args.clips)?;
    let episode: reelcut::Episode = read_json(&args.episode, "episode")?;

    let export = reelcut::export_otio(&episode, &timeline, &cfg)?;
    tracing::info!(
        fingerprint = %reelcut::fingerprint_otio(&export),
        content_type = export.content_type,
        "exported otio"
    );

    let out = args.out_dir.join(&export.file_name);
    write_output(&out, &export.body)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_duration(args: DurationArgs) -> anyhow::Result<()> {
    let value = args.value.trim();
    match value.parse::<f64>() {
        Ok(secs) => println!("{}", reelcut::duration::from_seconds(secs)),
        Err(_) => {
            let secs = reelcut::duration::parse_seconds(value)?;
            println!("{secs}");
        }
    }
    Ok(())
}
