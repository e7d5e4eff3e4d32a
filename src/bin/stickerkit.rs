use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use stickerkit::{
    AuthCheck, AuthPrompt, AvatarSource, BulkCommentEntry, CommentRenderSpec, Compositor,
    CpuSurface, DirSaver, DownloadOutcome, ExportMode, FontFace, JsonFileStore, KeyValueStore,
    PromptReason, RecordingSurface, StaticAuth, StickerConfig, StickerSession, StickerStyle,
    SystemClock, Theme, UsageGate,
};

/// Store file used when neither `--store` nor the config names one.
const DEFAULT_STORE_FILE: &str = "stickerkit-store.json";

#[derive(Parser, Debug)]
#[command(name = "stickerkit", version)]
struct Cli {
    /// JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Key/value store file (overrides the config).
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Log at debug level regardless of `RUST_LOG`.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one comment sticker to `comment.png`.
    Render(RenderArgs),
    /// Render a list of comments into `instagram_comments.zip`.
    Batch(BatchArgs),
    /// Show today's remaining free downloads.
    Usage(UsageArgs),
}

#[derive(Args, Debug)]
struct StyleArgs {
    /// Box color scheme.
    #[arg(long, value_enum)]
    theme: Option<ThemeChoice>,

    /// Sticker layout.
    #[arg(long, value_enum)]
    style: Option<StyleChoice>,

    /// Viewport width the canvas size is derived from.
    #[arg(long)]
    viewport: Option<u32>,

    /// Avatar image file or `data:` URL.
    #[arg(long, conflicts_with = "no_avatar")]
    avatar: Option<String>,

    /// Render without an avatar.
    #[arg(long)]
    no_avatar: bool,

    /// Font file for text (defaults to a system sans-serif).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Treat the caller as signed in (no daily limit).
    #[arg(long)]
    authenticated: bool,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[arg(long)]
    username: Option<String>,

    /// Comment body.
    #[arg(long)]
    body: Option<String>,

    /// Print the display list as JSON instead of writing a PNG. Not metered.
    #[arg(long)]
    dump_ops: bool,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// JSON array of `{"username": ..., "body_text": ...}` entries.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Milliseconds to wait between render and capture (overrides the config).
    #[arg(long)]
    settle_ms: Option<u64>,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Args, Debug)]
struct UsageArgs {
    /// Clear today's counter before reporting.
    #[arg(long)]
    reset: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeChoice {
    Light,
    Dark,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StyleChoice {
    Reels,
    Tiktok,
}

/// Headless stand-in for the sign-in modal.
struct CliPrompt;

impl AuthPrompt for CliPrompt {
    fn request(&mut self, reason: PromptReason) -> bool {
        match reason {
            PromptReason::LimitReached => {
                eprintln!("daily free limit reached; sign in (--authenticated) to continue")
            }
        }
        false
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut cfg = match &cli.config {
        Some(path) => StickerConfig::from_path(path)?,
        None => StickerConfig::default(),
    };
    if let Some(store) = cli.store {
        cfg.store_path = Some(store);
    }

    match cli.cmd {
        Command::Render(args) => cmd_render(cfg, args),
        Command::Batch(args) => cmd_batch(cfg, args),
        Command::Usage(args) => cmd_usage(&cfg, args),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_store(cfg: &StickerConfig) -> Arc<dyn KeyValueStore> {
    let path = cfg
        .store_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE));
    Arc::new(JsonFileStore::new(path))
}

fn apply_style(cfg: &mut StickerConfig, args: &StyleArgs) {
    if let Some(theme) = args.theme {
        cfg.theme = match theme {
            ThemeChoice::Light => Theme::Light,
            ThemeChoice::Dark => Theme::Dark,
        };
    }
    if let Some(style) = args.style {
        cfg.style = match style {
            StyleChoice::Reels => StickerStyle::Reels,
            StyleChoice::Tiktok => StickerStyle::Tiktok,
        };
    }
    if let Some(viewport) = args.viewport {
        cfg.viewport_width = viewport;
    }
    if let Some(font) = &args.font {
        cfg.font_path = Some(font.clone());
    }
}

fn avatar_source(args: &StyleArgs) -> anyhow::Result<AvatarSource> {
    if args.no_avatar {
        return Ok(AvatarSource::None);
    }
    match &args.avatar {
        None => Ok(AvatarSource::Default),
        Some(s) if s.starts_with("data:") => Ok(AvatarSource::DataUrl(s.clone())),
        Some(path) => {
            let bytes =
                std::fs::read(path).with_context(|| format!("read avatar '{path}'"))?;
            Ok(AvatarSource::Bytes(Arc::new(bytes)))
        }
    }
}

fn load_font(cfg: &StickerConfig) -> anyhow::Result<FontFace> {
    let face = match &cfg.font_path {
        Some(path) => FontFace::from_file(path)
            .with_context(|| format!("load font '{}'", path.display()))?,
        None => FontFace::system_sans_serif().context("resolve a system sans-serif font")?,
    };
    Ok(face)
}

fn auth_for(args: &StyleArgs) -> StaticAuth {
    if args.authenticated {
        StaticAuth(AuthCheck {
            authenticated: true,
            user: None,
        })
    } else {
        StaticAuth::anonymous()
    }
}

fn cmd_render(mut cfg: StickerConfig, args: RenderArgs) -> anyhow::Result<()> {
    apply_style(&mut cfg, &args.style);
    let avatar = avatar_source(&args.style)?;

    if args.dump_ops {
        let mut spec = CommentRenderSpec {
            avatar,
            theme: cfg.theme,
            canvas: cfg.canvas(),
            style: cfg.style,
            ..CommentRenderSpec::default()
        };
        if let Some(username) = args.username {
            spec.username = username;
        }
        if let Some(body) = args.body {
            spec.body_text = body;
        }
        let mut surface = RecordingSurface::new(spec.canvas);
        Compositor::new().render_complete(&spec, &mut surface);
        let json =
            serde_json::to_string_pretty(surface.ops()).context("serialize display list")?;
        println!("{json}");
        return Ok(());
    }

    let face = load_font(&cfg)?;
    let surface = CpuSurface::new(cfg.canvas(), &face)?;
    tracing::debug!(font = surface.font_family(), "text font resolved");

    let mut session = StickerSession::new(&cfg, open_store(&cfg), SystemClock, surface);
    if let Some(username) = args.username {
        session.set_username(username);
    }
    if let Some(body) = args.body {
        session.set_body_text(body);
    }
    session.set_avatar(avatar);

    download(&mut session, &args.style)
}

fn cmd_batch(mut cfg: StickerConfig, args: BatchArgs) -> anyhow::Result<()> {
    apply_style(&mut cfg, &args.style);
    if let Some(ms) = args.settle_ms {
        cfg.settle_ms = ms;
    }
    let entries = read_entries(&args.in_path)?;
    if entries.is_empty() {
        anyhow::bail!("'{}' contains no entries", args.in_path.display());
    }

    let face = load_font(&cfg)?;
    let surface = CpuSurface::new(cfg.canvas(), &face)?;
    let mut session = StickerSession::new(&cfg, open_store(&cfg), SystemClock, surface);
    session.set_avatar(avatar_source(&args.style)?);
    for entry in entries {
        session.set_username(entry.username);
        session.set_body_text(entry.body_text);
        session.add_bulk_entry();
    }
    session.set_mode(ExportMode::Bulk);

    download(&mut session, &args.style)
}

fn download<S, C>(
    session: &mut StickerSession<S, C, CpuSurface>,
    args: &StyleArgs,
) -> anyhow::Result<()>
where
    S: KeyValueStore + Clone,
    C: stickerkit::Clock,
{
    let mut saver = DirSaver::new(&args.out_dir);
    match session.download(&mut auth_for(args), &mut CliPrompt, &mut saver) {
        DownloadOutcome::Saved { path, show_promo } => {
            eprintln!("wrote {}", path.display());
            if show_promo {
                eprintln!("enjoying stickerkit? share it with a friend");
            }
            Ok(())
        }
        DownloadOutcome::Denied => anyhow::bail!("download refused: daily limit reached"),
        DownloadOutcome::Failed(msg) => anyhow::bail!("download failed: {msg}"),
    }
}

fn cmd_usage(cfg: &StickerConfig, args: UsageArgs) -> anyhow::Result<()> {
    let gate = UsageGate::new(open_store(cfg), SystemClock);
    if args.reset && !gate.reset_usage(&cfg.tool_id) {
        anyhow::bail!("could not reset usage for '{}'", cfg.tool_id);
    }
    let counter = gate.load_counter(&cfg.tool_id);
    println!(
        "{}: {} used on {}, {} of {} remaining",
        cfg.tool_id,
        counter.count,
        counter.date,
        gate.remaining_uses(&cfg.tool_id, cfg.daily_limit),
        cfg.daily_limit
    );
    Ok(())
}

fn read_entries(path: &Path) -> anyhow::Result<Vec<BulkCommentEntry>> {
    let f = File::open(path).with_context(|| format!("open entries '{}'", path.display()))?;
    let r = BufReader::new(f);
    let entries: Vec<BulkCommentEntry> =
        serde_json::from_reader(r).with_context(|| "parse entries JSON")?;
    Ok(entries)
}
