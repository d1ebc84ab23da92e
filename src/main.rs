//! Render a stored page document to a PNG.
//!
//! ```text
//! inkbook-render <page.json> <out.png> [--outline]
//! ```

use anyhow::{Context, Result, bail};
use inkbook::constants::PAPER_COLOR;
use inkbook::perf::measure_and_log;
use inkbook::{Color, GeometryEngine, InkSettings, LayeredCompositor, Page, logging};
use std::fs;
use std::path::PathBuf;

/// Replays slower than this are logged
const REPLAY_WARN_MS: f64 = 250.0;

struct Args {
    page: PathBuf,
    out: PathBuf,
    outline: bool,
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut outline = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--outline" => outline = true,
            flag if flag.starts_with("--") => bail!("unknown flag: {flag}"),
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    let [page, out]: [PathBuf; 2] = positional
        .try_into()
        .map_err(|_| anyhow::anyhow!("usage: inkbook-render <page.json> <out.png> [--outline]"))?;
    Ok(Args { page, out, outline })
}

fn main() -> Result<()> {
    logging::init_tracing("info");
    let args = parse_args()?;

    let content = fs::read_to_string(&args.page)
        .with_context(|| format!("reading {}", args.page.display()))?;
    let page: Page = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", args.page.display()))?;

    let settings = InkSettings::load();
    let geometry = if args.outline {
        GeometryEngine::new(inkbook::GeometryStrategy::Outline, settings.outline)
    } else {
        settings.geometry_engine()
    };

    let (width, height) = settings.page_size.pixels();
    let surface = measure_and_log("replay_page", REPLAY_WARN_MS, || {
        LayeredCompositor::replay(&page.strokes, width, height, &geometry)
    });
    let paper: Color = PAPER_COLOR.parse().context("paper color")?;
    surface
        .flatten_over(paper)
        .save(&args.out)
        .with_context(|| format!("writing {}", args.out.display()))?;

    tracing::info!(
        page_id = %page.id,
        strokes = page.strokes.len(),
        digest = %surface.digest(),
        out = %args.out.display(),
        "Rendered page"
    );
    Ok(())
}
