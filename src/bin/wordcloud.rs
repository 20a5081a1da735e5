use std::{
    fs::File,
    io::{BufRead as _, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "wordcloud", version)]
struct Cli {
    /// Log pipeline diagnostics to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a cloud from a list of responses.
    Render(RenderArgs),
    /// Replay a JSON-lines stream of question/word events and render the final display.
    Replay(ReplayArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Responses: `.json` array of strings, otherwise one response per line.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Events, one JSON object per line: `{"type":"question"|"word","text":"..."}`.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    /// Also rasterize to this PNG path.
    #[arg(long)]
    png: Option<PathBuf>,

    /// Canvas width.
    #[arg(long, default_value_t = 500.0)]
    width: f64,

    /// Canvas height.
    #[arg(long, default_value_t = 300.0)]
    height: f64,

    /// Color theme (overrides the config file).
    #[arg(long, value_enum)]
    theme: Option<ThemeChoice>,

    /// Seed for rotation choices (overrides the config file).
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font file used to measure words (defaults to a font-free estimate).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Omit hover/entrance CSS from the SVG.
    #[arg(long = "static")]
    static_svg: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeChoice {
    Light,
    Dark,
}

impl From<ThemeChoice> for wordcloud::Theme {
    fn from(value: ThemeChoice) -> Self {
        match value {
            ThemeChoice::Light => Self::Light,
            ThemeChoice::Dark => Self::Dark,
        }
    }
}

const LAYOUT_TIMEOUT: Duration = Duration::from_secs(60);

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Replay(args) => cmd_replay(args),
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

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let words = read_words(&args.in_path)?;
    let mut renderer = make_renderer(&args.output)?;
    if !words.is_empty() {
        renderer.words_received(words);
        renderer.wait(LAYOUT_TIMEOUT);
    }
    write_outputs(&renderer, &args.output)
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let events = read_events(&args.in_path)?;
    let renderer = make_renderer(&args.output)?;

    let channel = wordcloud::LocalChannel::new();
    let mut display = wordcloud::DisplaySession::connect(&channel, renderer)?;
    let feeder = channel.connect()?;
    for event in events {
        feeder.emit(event)?;
        display.pump();
    }
    display.renderer_mut().wait(LAYOUT_TIMEOUT);

    let renderer = display.close();
    write_outputs(&renderer, &args.output)
}

fn make_renderer(args: &OutputArgs) -> anyhow::Result<wordcloud::CloudRenderer> {
    let mut cfg = match &args.config {
        Some(path) => wordcloud::CloudConfig::load(path)?,
        None => wordcloud::CloudConfig::default(),
    };
    if let Some(theme) = args.theme {
        cfg.theme = theme.into();
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }

    let canvas = wordcloud::CanvasSize::new(args.width, args.height)?;
    let engine: Box<dyn wordcloud::LayoutEngine> = match &args.font {
        Some(path) => {
            let bytes =
                std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
            let measure = wordcloud::ParleyMeasure::from_font_bytes(&bytes)?;
            eprintln!("measuring with font family '{}'", measure.family_name());
            cfg.prefer_font_family(measure.family_name());
            Box::new(wordcloud::SpiralLayout::new(measure))
        }
        None => Box::new(wordcloud::SpiralLayout::default()),
    };

    Ok(wordcloud::CloudRenderer::new(cfg, canvas, engine)?)
}

fn write_outputs(renderer: &wordcloud::CloudRenderer, args: &OutputArgs) -> anyhow::Result<()> {
    let svg = renderer.to_svg(wordcloud::SvgOptions {
        animated: !args.static_svg,
    });
    write_file(&args.out, &svg)?;
    eprintln!("wrote {}", args.out.display());

    if let Some(png) = &args.png {
        let still = renderer.to_svg(wordcloud::SvgOptions { animated: false });
        let image = wordcloud::rasterize_svg(&still)?;
        wordcloud::write_png(&image, png)?;
        eprintln!("wrote {}", png.display());
    }

    match renderer.scene() {
        Some(scene) => eprintln!(
            "{} of {} unique words placed",
            scene.len(),
            renderer.frequencies().len()
        ),
        None => eprintln!("no responses; wrote waiting state"),
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("write '{}'", path.display()))
}

fn read_words(path: &Path) -> anyhow::Result<Vec<String>> {
    let f = File::open(path).with_context(|| format!("open responses '{}'", path.display()))?;
    let r = BufReader::new(f);

    let words: Vec<String> = if path.extension().is_some_and(|e| e == "json") {
        serde_json::from_reader(r).with_context(|| "parse responses JSON")?
    } else {
        r.lines()
            .collect::<Result<Vec<String>, _>>()
            .with_context(|| "read responses")?
    };

    // Blank entries never reach the cloud.
    Ok(words
        .into_iter()
        .filter(|w| wordcloud::validate_response(w).is_ok())
        .collect())
}

fn read_events(path: &Path) -> anyhow::Result<Vec<wordcloud::ChannelEvent>> {
    let f = File::open(path).with_context(|| format!("open events '{}'", path.display()))?;
    let mut events = Vec::new();
    for (i, line) in BufReader::new(f).lines().enumerate() {
        let line = line.with_context(|| "read events")?;
        if line.trim().is_empty() {
            continue;
        }
        let event: wordcloud::ChannelEvent = serde_json::from_str(&line)
            .with_context(|| format!("parse event on line {}", i + 1))?;
        events.push(event);
    }
    Ok(events)
}
