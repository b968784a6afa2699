pub mod check;
pub mod compose;
pub mod config;
pub mod share;
pub mod validate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use ticketshare_banner_model::props::{BannerProps, BookingData, EventInfo, UserProfile};
use ticketshare_banner_model::source::UploadedFile;
use ticketshare_common::config::AppConfig;
use ticketshare_compositor::ComposeError;
use ticketshare_session::{BannerServices, BannerSession, GenerateOutcome, SkipReason};
use ticketshare_share::clipboard::default_clipboard;
use ticketshare_share::{NoNativeShare, ObjectUrl};

/// Event and attendee inputs shared by `compose` and `share`.
#[derive(Args, Debug, Clone)]
pub struct BannerArgs {
    /// Event title
    #[arg(short, long)]
    pub title: String,

    /// Event background image (URL, file:// URI or path)
    #[arg(short, long)]
    pub banner: String,

    /// Profile picture (URL, file:// URI or path)
    #[arg(short, long)]
    pub photo: Option<String>,

    /// Upload a local photo instead of using the profile picture
    #[arg(short, long)]
    pub upload: Option<PathBuf>,

    /// Attendee name from the booking
    #[arg(short, long)]
    pub name: Option<String>,

    /// Profile display name, used when no attendee name is given
    #[arg(long)]
    pub profile_name: Option<String>,
}

impl BannerArgs {
    pub fn props(&self) -> BannerProps {
        BannerProps {
            event: EventInfo {
                title: self.title.clone(),
                social_banner: Some(self.banner.clone()),
            },
            user_profile: Some(UserProfile {
                profile_picture: self.photo.clone(),
                name: self.profile_name.clone(),
            }),
            booking_data: Some(BookingData {
                attendee_name: self.name.clone(),
            }),
        }
    }
}

/// Guess an upload's MIME type from its extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Read a local file as if it had been picked in the upload dialog.
pub fn read_upload(path: &Path) -> anyhow::Result<UploadedFile> {
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(UploadedFile::new(name, mime_for_path(path), bytes))
}

/// Open a session for `args` and generate its banner.
pub async fn open_and_generate(
    config: &AppConfig,
    args: &BannerArgs,
) -> anyhow::Result<(BannerSession, ObjectUrl)> {
    let services =
        BannerServices::from_config(config, Arc::new(NoNativeShare), default_clipboard())?;
    let session = BannerSession::open(args.props(), services);

    if let Some(path) = &args.upload {
        let file = read_upload(path)?;
        session
            .handle_file_selected(file)
            .await
            .map_err(|e| anyhow::anyhow!("{}: {e}", e.user_message()))?;
    }

    println!("Generating banner for: {}", args.title);
    match session.generate().await {
        Ok(GenerateOutcome::Ready(url)) => Ok((session, url)),
        Ok(GenerateOutcome::Skipped(SkipReason::NoPreview)) => Err(anyhow::anyhow!(
            "No photo to put on the banner. Pass --photo or --upload."
        )),
        Ok(GenerateOutcome::Skipped(reason)) => {
            Err(anyhow::anyhow!("Banner was not generated ({reason:?})"))
        }
        Err(e) => {
            tracing::debug!(error = %e, "Generation failed");
            Err(anyhow::anyhow!("{} ({e})", ComposeError::USER_MESSAGE))
        }
    }
}
