use crate::Args;
use anyhow::{Context, Result};
use pagemark_config::PagemarkConfig;
use pagemark_drivers::fetch::fetch_and_clean;
use pagemark_drivers::reader_browser::FetchOptions;
use pagemark_llm::client_from_config;
use pagemark_sanitize::SanitizeOptions;
use std::time::Duration;

/// Run the fetch → sanitize → generate pipeline once and write the result.
pub async fn run(args: Args, cfg: PagemarkConfig) -> Result<()> {
    // CLI flags can only turn masking on; config supplies the baseline.
    let sanitize = SanitizeOptions {
        mask_svg: cfg.sanitize.mask_svg || args.mask_svg,
        mask_base64: cfg.sanitize.mask_base64 || args.mask_base64,
    };
    let fetch = FetchOptions {
        webdriver_url: cfg.fetch.webdriver_url.clone(),
        headless: cfg.fetch.headless && !args.headed,
        settle: Duration::from_millis(cfg.fetch.settle_ms),
        deadline: Duration::from_secs(cfg.fetch.timeout_secs),
    };

    tracing::info!(url = %args.url, "fetching page");
    let cleaned = fetch_and_clean(&args.url, &fetch, &sanitize).await?;
    tracing::debug!(cleaned_len = cleaned.len(), "sanitized page source");

    if args.raw_html {
        println!("{cleaned}");
        return Ok(());
    }

    let schema = match &args.schema {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read schema file: {}", path.display()))?,
        ),
        None => None,
    };

    let client = client_from_config(&cfg.llm).await?;
    tracing::info!(model = client.model_name(), "generating");
    let rendered = client
        .render(&cleaned, args.instruction.as_deref(), schema.as_deref())
        .await?;

    let out_path = args.out.unwrap_or(cfg.output.path);
    std::fs::write(&out_path, &rendered)
        .with_context(|| format!("failed to write output file: {}", out_path.display()))?;
    tracing::info!(path = %out_path.display(), bytes = rendered.len(), "wrote rendered output");

    let preview: String = rendered.chars().take(cfg.output.preview_chars).collect();
    println!("{preview}");

    Ok(())
}
