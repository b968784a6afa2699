//! Render a banner and save it as a download.

use std::path::PathBuf;

use ticketshare_common::config::AppConfig;

use super::{open_and_generate, BannerArgs};

pub async fn run(
    mut config: AppConfig,
    args: BannerArgs,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Some(dir) = output_dir {
        config.export.downloads_dir = dir;
    }

    let (session, url) = open_and_generate(&config, &args).await?;
    println!("  Banner ready: {url}");

    let saved = session
        .download()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to save banner: {e}"))?;
    match saved {
        Some(path) => println!("Saved: {}", path.display()),
        None => println!("Nothing to save."),
    }

    session.close();
    Ok(())
}
