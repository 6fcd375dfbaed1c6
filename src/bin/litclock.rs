use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use litclock::{
    BatchOpts, BatchRunner, FailurePolicy, FontDescriptor, ImageComposer, MinuteRange,
    ParleyEngine, PngSink, QuoteBook, RunConfig, StyleOverrides, StylePreset, TimeSlot,
};

#[derive(Parser, Debug)]
#[command(name = "litclock", version, about = "Render literature clock quotes as PNG images")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every quote into `<dst>` and `<dst>/metadata`.
    Render(RenderArgs),
    /// Check a quote file against the data contract and list every violation.
    Check(CheckArgs),
    /// Print the fitted font size of each quote in one time slot.
    Fit(FitArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Quote file (`.yaml`, `.yml` or `.json`).
    src: PathBuf,

    /// Destination directory.
    dst: PathBuf,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Quote file (`.yaml`, `.yml` or `.json`).
    src: PathBuf,
}

#[derive(Args, Debug)]
struct FitArgs {
    /// Quote file (`.yaml`, `.yml` or `.json`).
    src: PathBuf,

    /// Time slot to fit, `HH:MM`.
    #[arg(long)]
    time: TimeSlot,

    #[command(flatten)]
    run: RunArgs,
}

/// Run configuration file plus per-field overrides.
#[derive(Args, Debug)]
struct RunArgs {
    /// JSON run configuration; every field is optional.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Image width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Margin in pixels.
    #[arg(long)]
    margin: Option<f32>,

    /// Quote body font, e.g. "Noto Serif" or "Sans 300".
    #[arg(long)]
    text_font: Option<FontDescriptor>,

    /// Time phrase font.
    #[arg(long)]
    time_font: Option<FontDescriptor>,

    /// Credit line font.
    #[arg(long)]
    meta_font: Option<FontDescriptor>,

    /// Base color theme.
    #[arg(long, value_enum)]
    preset: Option<StylePreset>,

    /// Convert the written PNGs to grayscale.
    #[arg(long)]
    grayscale: bool,

    /// First time slot to render, `HH:MM`.
    #[arg(long)]
    from: Option<TimeSlot>,

    /// Last time slot to render (inclusive), `HH:MM`.
    #[arg(long)]
    to: Option<TimeSlot>,

    /// What to do with a quote that cannot be rendered.
    #[arg(long, value_enum)]
    on_fit_error: Option<FailurePolicy>,

    /// Do not print the font-size statistics.
    #[arg(long)]
    no_stats: bool,

    /// Only use font files listed in the run configuration.
    #[arg(long)]
    no_system_fonts: bool,
}

impl RunArgs {
    fn resolve(&self) -> anyhow::Result<RunConfig> {
        let mut cfg = match &self.config {
            Some(path) => RunConfig::from_path(path)?,
            None => RunConfig::default(),
        };

        if let Some(w) = self.width {
            cfg.render_box.width = w;
        }
        if let Some(h) = self.height {
            cfg.render_box.height = h;
        }
        if let Some(m) = self.margin {
            cfg.render_box.margin = m;
        }
        if let Some(preset) = self.preset {
            cfg.style.preset = preset;
        }
        let flags = StyleOverrides {
            body_font: self.text_font.clone(),
            time_font: self.time_font.clone(),
            metadata_font: self.meta_font.clone(),
            ..StyleOverrides::default()
        };
        cfg.style.overrides = cfg.style.overrides.merged(&flags);
        if self.grayscale {
            cfg.grayscale = true;
        }
        if self.from.is_some() || self.to.is_some() {
            let base = cfg.minutes.unwrap_or_else(MinuteRange::full_day);
            cfg.minutes = Some(MinuteRange::new(
                self.from.unwrap_or(base.first),
                self.to.unwrap_or(base.last),
            )?);
        }
        if let Some(policy) = self.on_fit_error {
            cfg.on_fit_error = policy;
        }
        if self.no_stats {
            cfg.stats = false;
        }
        if self.no_system_fonts {
            cfg.system_fonts = false;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", env!("CARGO_CRATE_NAME")))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Check(args) => cmd_check(args),
        Command::Fit(args) => cmd_fit(args),
    }
}

fn make_composer(cfg: &RunConfig) -> anyhow::Result<ImageComposer<ParleyEngine>> {
    let mut engine = ParleyEngine::with_system_fonts(cfg.system_fonts);
    for font in &cfg.fonts {
        let families = engine
            .register_font_file(font)
            .with_context(|| format!("register font '{}'", font.display()))?;
        tracing::info!(path = %font.display(), ?families, "registered font file");
    }
    if !engine.has_fonts() {
        anyhow::bail!("no fonts available; install system fonts or list font files in --config");
    }
    Ok(ImageComposer::new(
        engine,
        cfg.render_box,
        cfg.style.resolve()?,
        cfg.fit,
    ))
}

fn load_book(src: &Path, policy: FailurePolicy) -> anyhow::Result<QuoteBook> {
    let report = QuoteBook::from_path(src, policy)
        .with_context(|| format!("load quotes '{}'", src.display()))?;
    for e in &report.rejected {
        eprintln!("rejected: {e}");
    }
    Ok(report.book)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = args.run.resolve()?;
    let book = load_book(&args.src, cfg.on_fit_error)?;

    let opts = BatchOpts {
        minutes: cfg.minutes.unwrap_or_else(MinuteRange::full_day),
        policy: cfg.on_fit_error,
        collect_stats: cfg.stats,
    };
    let mut runner = BatchRunner::new(make_composer(&cfg)?, opts);
    let mut sink = PngSink::new(&args.dst, cfg.grayscale);
    let summary = runner
        .run(&book, &mut sink)
        .with_context(|| format!("render into '{}'", args.dst.display()))?;

    for s in &summary.skipped {
        eprintln!("skipped {}: {}", s.name, s.error);
    }
    if let Some(stats) = &summary.stats {
        println!("{stats}");
    }
    if let Some(missing) = summary.missing_report() {
        println!("{missing}");
    }
    eprintln!(
        "wrote {} quotes to {}",
        summary.rendered,
        args.dst.display()
    );
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let report = QuoteBook::from_path(&args.src, FailurePolicy::Skip)
        .with_context(|| format!("load quotes '{}'", args.src.display()))?;
    if report.rejected.is_empty() {
        println!("all quotes ok ({} records)", report.book.len());
        return Ok(());
    }
    for e in &report.rejected {
        println!("{e}");
    }
    anyhow::bail!("{} errors in quotes", report.rejected.len())
}

fn cmd_fit(args: FitArgs) -> anyhow::Result<()> {
    let cfg = args.run.resolve()?;
    let book = load_book(&args.src, FailurePolicy::Skip)?;
    let records = book.records(args.time);
    if records.is_empty() {
        anyhow::bail!("no quotes for {}", args.time);
    }

    let mut composer = make_composer(&cfg)?;
    for (i, record) in records.iter().enumerate() {
        match composer.fit_quote(&record.quote, &record.timestring) {
            Ok((_, fit)) => println!(
                "{} #{i}: {:.1}px ({} probes, {} rounds)",
                args.time, fit.size, fit.probes, fit.rounds
            ),
            Err(e) => println!("#{i} {}", e.in_quote(args.time, &record.quote)),
        }
    }
    Ok(())
}
