//! Render a banner and share it.

use ticketshare_common::config::AppConfig;

use super::{open_and_generate, BannerArgs};

pub async fn run(
    mut config: AppConfig,
    args: BannerArgs,
    page_url: Option<String>,
) -> anyhow::Result<()> {
    if page_url.is_some() {
        config.share.page_url = page_url;
    }

    let (session, _url) = open_and_generate(&config, &args).await?;

    let outcome = session.share().await;
    tracing::debug!(?outcome, "Share attempt finished");
    match session.last_message() {
        Some(message) => println!("{message}"),
        None => println!("Shared."),
    }

    session.close();
    Ok(())
}
