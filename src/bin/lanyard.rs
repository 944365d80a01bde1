use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lanyard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the token for a display name.
    Encode(EncodeArgs),
    /// Print the display name carried by a token.
    Decode(DecodeArgs),
    /// Print a share link for a display name.
    Link(LinkArgs),
    /// Print the display name carried by a share link.
    Resolve(ResolveArgs),
    /// Render a card texture.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct EncodeArgs {
    /// Display name (may be empty).
    name: String,
}

#[derive(Parser, Debug)]
struct DecodeArgs {
    /// Token produced by `encode`.
    token: String,
}

#[derive(Parser, Debug)]
struct LinkArgs {
    /// Card page URL the token is attached to.
    #[arg(long)]
    base: String,

    /// Display name (may be empty).
    name: String,
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Share link carrying a `u` parameter.
    link: String,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Display name. Omitted or empty renders the placeholder.
    #[arg(long)]
    name: Option<String>,

    /// Take the name from a token instead of `--name`.
    #[arg(long, conflicts_with = "name")]
    token: Option<String>,

    /// Icon image (PNG, JPEG, SVG, ...).
    #[arg(long)]
    icon: Option<PathBuf>,

    /// TTF/OTF used for the name instead of the bundled monospace face.
    #[arg(long)]
    font: Option<PathBuf>,

    /// JSON style overrides.
    #[arg(long)]
    style: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print the texture as a `data:image/png;base64,` URL on stdout.
    #[arg(long, default_value_t = false)]
    data_url: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Encode(args) => {
            println!("{}", lanyard::encode(&args.name));
            Ok(())
        }
        Command::Decode(args) => {
            let name = lanyard::decode(&args.token).context("decode token")?;
            println!("{name}");
            Ok(())
        }
        Command::Link(args) => {
            let url = lanyard::share_link(&args.base, &args.name).context("build share link")?;
            println!("{url}");
            Ok(())
        }
        Command::Resolve(args) => {
            let name = lanyard::name_from_link(&args.link).context("resolve share link")?;
            println!("{name}");
            Ok(())
        }
        Command::Render(args) => cmd_render(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    if args.out.is_none() && !args.data_url {
        anyhow::bail!("nothing to do: pass --out and/or --data-url");
    }

    let name = match (&args.name, &args.token) {
        (_, Some(token)) => Some(lanyard::decode(token).context("decode --token")?),
        (name, None) => name.clone(),
    };

    let mut comp = lanyard::CardCompositor::new();
    if let Some(path) = &args.style {
        comp = comp.with_style(lanyard::CardStyle::from_path(path)?);
    }
    if let Some(path) = &args.font {
        comp = comp.with_font_path(path)?;
    }
    let icon = args
        .icon
        .as_ref()
        .map(lanyard::IconAsset::from_path)
        .transpose()?;

    let texture = comp.compose(name.as_deref(), icon.as_ref())?;

    if let Some(out) = &args.out {
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        texture.save(out)?;
        eprintln!("wrote {}", out.display());
    }
    if args.data_url {
        println!("{}", texture.to_data_url());
    }
    Ok(())
}
