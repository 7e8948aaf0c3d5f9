use anyhow::Result;
use clap::Parser;
use pagemark_common::observability::LogConfig;
use pagemark_common::observability::init_logging;
use pagemark_config::{PagemarkConfig, PagemarkConfigLoader};
use std::path::PathBuf;
use url::Url;
mod pipeline;

/// Render a web page's main content as Markdown via a reader model.
#[derive(Parser, Debug)]
#[command(name = "pagemark", version)]
struct Args {
    /// Page to fetch and render.
    url: Url,

    /// Output file path (overrides config; default `output.md`).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Instruction overriding the default Markdown-conversion one.
    #[arg(long)]
    instruction: Option<String>,

    /// Path to a JSON schema file; switches to schema-directed extraction.
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Mask inline <svg> interiors with a placeholder.
    #[arg(long)]
    mask_svg: bool,

    /// Collapse base64-embedded <img> tags to a stub.
    #[arg(long)]
    mask_base64: bool,

    /// Run the browser with a visible window.
    #[arg(long)]
    headed: bool,

    /// Config file; `pagemark.yaml` is picked up automatically when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the cleaned HTML to stdout instead of invoking the model.
    #[arg(long)]
    raw_html: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load config (env wins over file)
    let cfg: PagemarkConfig = match &args.config {
        Some(path) => PagemarkConfigLoader::new().with_file(path).load()?,
        None => PagemarkConfigLoader::new()
            .with_optional_file("pagemark.yaml")
            .load()?,
    };

    init_logging(LogConfig::default())?;

    pipeline::run(args, cfg).await
}
