//! End-to-end banner session tests with in-memory platform fakes.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use ticketshare_banner_model::props::{BannerProps, BookingData, EventInfo, UserProfile};
use ticketshare_banner_model::share::{ShareFile, ShareStatement};
use ticketshare_banner_model::source::{SourceKind, UploadedFile, ValidationError};
use ticketshare_compositor::loader::{ImageLoader, LoadError};
use ticketshare_compositor::text::NoTextPainter;
use ticketshare_compositor::{ComposeError, CompositionEngine};
use ticketshare_session::{BannerServices, BannerSession, BannerState, GenerateOutcome, SkipReason};
use ticketshare_share::{
    ArtifactExporter, Clipboard, ClipboardError, NativeShare, NoNativeShare, ObjectUrlRegistry,
    ShareDispatcher, ShareError, ShareOutcome,
};

const BANNER: &str = "https://cdn.example.com/banner.jpg";
const PROFILE: &str = "https://cdn.example.com/ada.png";
const PAGE_URL: &str = "https://tickets.example/events/rustconf";

#[derive(Default)]
struct FakeLoader {
    images: HashMap<String, [u8; 4]>,
    delay: Option<Duration>,
    loads: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl ImageLoader for FakeLoader {
    async fn load(&self, uri: &str) -> Result<DynamicImage, LoadError> {
        self.loads.lock().unwrap().push(uri.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let color = if uri.starts_with("data:image/") {
            [0, 200, 0, 255]
        } else {
            *self.images.get(uri).ok_or(LoadError::Http {
                message: "404 Not Found".to_string(),
            })?
        };
        Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            64,
            64,
            Rgba(color),
        )))
    }
}

#[derive(Default)]
struct FakeClipboard {
    written: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Clipboard for FakeClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.written.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

#[derive(Default)]
struct FakeShareSheet {
    shared: Mutex<Vec<ShareStatement>>,
}

#[async_trait::async_trait]
impl NativeShare for FakeShareSheet {
    fn is_available(&self) -> bool {
        true
    }

    fn can_share(&self, files: &[ShareFile]) -> bool {
        !files.is_empty()
    }

    async fn share(&self, statement: &ShareStatement) -> Result<(), ShareError> {
        self.shared.lock().unwrap().push(statement.clone());
        Ok(())
    }
}

struct Harness {
    session: BannerSession,
    loader: Arc<FakeLoader>,
    clipboard: Arc<FakeClipboard>,
    registry: ObjectUrlRegistry,
    downloads: PathBuf,
}

fn props(banner: Option<&str>, picture: Option<&str>) -> BannerProps {
    BannerProps {
        event: EventInfo {
            title: "Rust Conf 2025".to_string(),
            social_banner: banner.map(str::to_string),
        },
        user_profile: Some(UserProfile {
            profile_picture: picture.map(str::to_string),
            name: Some("Ada L.".to_string()),
        }),
        booking_data: Some(BookingData {
            attendee_name: Some("Ada Lovelace".to_string()),
        }),
    }
}

fn harness_with(
    props: BannerProps,
    native: Arc<dyn NativeShare>,
    delay: Option<Duration>,
) -> Harness {
    let mut images = HashMap::new();
    images.insert(BANNER.to_string(), [200, 30, 30, 255]);
    images.insert(PROFILE.to_string(), [30, 30, 200, 255]);
    let loader = Arc::new(FakeLoader {
        images,
        delay,
        loads: Mutex::new(Vec::new()),
    });
    let clipboard = Arc::new(FakeClipboard::default());
    let downloads = std::env::temp_dir().join(format!(
        "ticketshare_session_{}_{}",
        std::process::id(),
        NEXT_DIR.fetch_add(1, Ordering::SeqCst)
    ));

    let registry = ObjectUrlRegistry::new();
    let engine = CompositionEngine::new(loader.clone(), Arc::new(NoTextPainter));
    let exporter = ArtifactExporter::new(registry.clone(), &downloads);
    let dispatcher = ShareDispatcher::new(
        registry.clone(),
        native,
        clipboard.clone(),
        Some(PAGE_URL.to_string()),
    );
    let services = BannerServices::new(Arc::new(engine), exporter, Arc::new(dispatcher));

    Harness {
        session: BannerSession::open(props, services),
        loader,
        clipboard,
        registry,
        downloads,
    }
}

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

fn harness() -> Harness {
    harness_with(props(Some(BANNER), Some(PROFILE)), Arc::new(NoNativeShare), None)
}

async fn wait_for_state(session: &BannerSession, state: BannerState) {
    while session.state() != state {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn generate_then_download_writes_banner_png() {
    let h = harness();
    let view = h.session.view().unwrap();
    assert_eq!(view.state, BannerState::Idle);
    assert_eq!(view.preview.as_deref(), Some(PROFILE));
    assert_eq!(view.source, SourceKind::ProfilePicture);

    let url = match h.session.generate().await.unwrap() {
        GenerateOutcome::Ready(url) => url,
        other => panic!("expected a banner, got {other:?}"),
    };
    assert_eq!(h.session.state(), BannerState::Ready);
    assert_eq!(h.session.artifact_url(), Some(url.clone()));
    assert_eq!(*h.loader.loads.lock().unwrap(), vec![BANNER.to_string(), PROFILE.to_string()]);

    let path = h.session.download().await.unwrap().unwrap();
    assert_eq!(path, h.downloads.join("Rust-Conf-2025-ticket.png"));
    let saved = image::open(&path).unwrap();
    assert_eq!(saved.dimensions(), (1200, 630));
    assert_eq!(h.session.state(), BannerState::Ready);

    std::fs::remove_dir_all(&h.downloads).ok();
}

#[tokio::test]
async fn overlapping_generate_yields_one_artifact() {
    let h = harness_with(
        props(Some(BANNER), Some(PROFILE)),
        Arc::new(NoNativeShare),
        Some(Duration::from_millis(30)),
    );

    let (first, second) = tokio::join!(h.session.generate(), async {
        wait_for_state(&h.session, BannerState::Generating).await;
        h.session.generate().await
    });

    assert!(matches!(first.unwrap(), GenerateOutcome::Ready(_)));
    assert_eq!(
        second.unwrap(),
        GenerateOutcome::Skipped(SkipReason::InFlight)
    );
    assert_eq!(h.registry.len(), 1);
    assert_eq!(h.loader.loads.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn generate_after_ready_is_a_no_op() {
    let h = harness();
    h.session.generate().await.unwrap();
    assert_eq!(
        h.session.generate().await.unwrap(),
        GenerateOutcome::Skipped(SkipReason::AlreadyGenerated)
    );
    assert_eq!(h.registry.len(), 1);
}

#[tokio::test]
async fn invalid_upload_leaves_selection_unchanged() {
    let h = harness();

    let err = h
        .session
        .handle_file_selected(UploadedFile::new("notes.txt", "text/plain", vec![1, 2, 3]))
        .await
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidType { .. }));
    assert_eq!(h.session.last_message().as_deref(), Some("Please select an image file"));

    let err = h
        .session
        .handle_file_selected(UploadedFile::new(
            "huge.png",
            "image/png",
            vec![0; 5 * 1024 * 1024 + 1],
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, ValidationError::TooLarge { .. }));

    assert_eq!(h.session.preview().as_deref(), Some(PROFILE));
    assert_eq!(h.session.active_source(), SourceKind::ProfilePicture);
}

#[tokio::test]
async fn upload_is_used_and_toggling_back_clears_it() {
    let h = harness();
    h.session
        .handle_file_selected(UploadedFile::new("me.png", "image/png", vec![9; 16]))
        .await
        .unwrap();
    assert_eq!(h.session.active_source(), SourceKind::UploadedFile);
    assert!(h
        .session
        .preview()
        .unwrap()
        .starts_with("data:image/png;base64,"));

    h.session.select_profile_picture();
    assert_eq!(h.session.active_source(), SourceKind::ProfilePicture);
    assert_eq!(h.session.preview().as_deref(), Some(PROFILE));

    h.session.generate().await.unwrap();
    assert_eq!(h.loader.loads.lock().unwrap()[1], PROFILE);
}

#[tokio::test]
async fn uploaded_photo_is_drawn_in_circle() {
    let h = harness();
    h.session
        .handle_file_selected(UploadedFile::new("me.png", "image/png", vec![9; 16]))
        .await
        .unwrap();
    let GenerateOutcome::Ready(url) = h.session.generate().await.unwrap() else {
        panic!("expected a banner");
    };

    let blob = h.registry.resolve(&url).unwrap();
    let banner = image::load_from_memory(&blob.bytes).unwrap().to_rgba8();
    assert_eq!(banner.get_pixel(1050, 480).0, [0, 200, 0, 255]);
    assert_eq!(banner.get_pixel(10, 10).0, [200, 30, 30, 255]);
}

#[tokio::test]
async fn without_banner_session_is_inert() {
    let h = harness_with(props(None, Some(PROFILE)), Arc::new(NoNativeShare), None);

    assert!(h.session.is_inert());
    assert!(h.session.view().is_none());
    assert_eq!(
        h.session.generate().await.unwrap(),
        GenerateOutcome::Skipped(SkipReason::Inert)
    );
    h.session
        .handle_file_selected(UploadedFile::new("me.png", "image/png", vec![1]))
        .await
        .unwrap();
    assert_eq!(h.session.active_source(), SourceKind::ProfilePicture);
    assert!(h.session.download().await.unwrap().is_none());
    assert!(h.session.share().await.is_none());
    assert!(!h.session.create_another());

    assert!(h.loader.loads.lock().unwrap().is_empty());
    assert!(h.registry.is_empty());
}

#[tokio::test]
async fn without_photo_generate_does_nothing() {
    let h = harness_with(props(Some(BANNER), None), Arc::new(NoNativeShare), None);
    assert!(h.session.view().unwrap().preview.is_none());
    assert_eq!(
        h.session.generate().await.unwrap(),
        GenerateOutcome::Skipped(SkipReason::NoPreview)
    );
    assert_eq!(h.session.state(), BannerState::Idle);
    assert!(h.loader.loads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn share_without_native_sheet_copies_link() {
    let h = harness();
    h.session.generate().await.unwrap();

    let outcome = h.session.share().await.unwrap();
    assert_eq!(outcome, ShareOutcome::LinkCopied);
    assert_eq!(*h.clipboard.written.lock().unwrap(), vec![PAGE_URL.to_string()]);
    assert_eq!(h.session.last_message().as_deref(), Some("Link copied to clipboard!"));
    assert_eq!(h.session.state(), BannerState::Ready);
}

#[tokio::test]
async fn share_with_native_sheet_sends_banner() {
    let sheet = Arc::new(FakeShareSheet::default());
    let h = harness_with(props(Some(BANNER), Some(PROFILE)), sheet.clone(), None);
    h.session.generate().await.unwrap();

    assert_eq!(h.session.share().await, Some(ShareOutcome::Shared));
    assert!(h.session.last_message().is_none());
    assert!(h.clipboard.written.lock().unwrap().is_empty());

    let shared = sheet.shared.lock().unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].title, "I'm attending Rust Conf 2025!");
    assert_eq!(shared[0].files[0].name, "event-ticket.png");
}

#[tokio::test]
async fn failed_load_returns_to_idle_with_message() {
    let h = harness_with(
        props(Some("https://cdn.example.com/missing.jpg"), Some(PROFILE)),
        Arc::new(NoNativeShare),
        None,
    );

    let err = h.session.generate().await.unwrap_err();
    assert!(matches!(err, ComposeError::ImageLoad { .. }));
    assert_eq!(h.session.state(), BannerState::Idle);
    assert_eq!(
        h.session.last_message().as_deref(),
        Some("Failed to generate banner. Please try again.")
    );
    assert!(h.session.artifact_url().is_none());
    assert!(h.registry.is_empty());
}

#[tokio::test]
async fn create_another_revokes_and_allows_regeneration() {
    let h = harness();
    let GenerateOutcome::Ready(first) = h.session.generate().await.unwrap() else {
        panic!("expected a banner");
    };

    assert!(h.session.create_another());
    assert_eq!(h.session.state(), BannerState::Idle);
    assert!(h.session.artifact_url().is_none());
    assert!(h.registry.resolve(&first).is_none());

    let GenerateOutcome::Ready(second) = h.session.generate().await.unwrap() else {
        panic!("expected a banner");
    };
    assert_ne!(first, second);
    assert_eq!(h.registry.len(), 1);
}

#[tokio::test]
async fn close_revokes_and_notifies_host() {
    let closed = Arc::new(AtomicUsize::new(0));
    let Harness { session, registry, .. } = harness();
    let hook_count = closed.clone();
    let session = session.with_on_close(move || {
        hook_count.fetch_add(1, Ordering::SeqCst);
    });

    session.generate().await.unwrap();
    assert_eq!(registry.len(), 1);

    session.close();
    session.close();
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    assert!(!session.is_open());
    assert!(session.view().is_none());
    assert!(registry.is_empty());
    assert_eq!(
        session.generate().await.unwrap(),
        GenerateOutcome::Skipped(SkipReason::Closed)
    );
}

#[tokio::test]
async fn close_during_generation_discards_result() {
    let h = harness_with(
        props(Some(BANNER), Some(PROFILE)),
        Arc::new(NoNativeShare),
        Some(Duration::from_millis(30)),
    );

    let (outcome, ()) = tokio::join!(h.session.generate(), async {
        wait_for_state(&h.session, BannerState::Generating).await;
        h.session.close();
    });

    assert_eq!(outcome.unwrap(), GenerateOutcome::Skipped(SkipReason::Closed));
    assert!(h.registry.is_empty());
    assert!(h.session.artifact_url().is_none());
    assert_eq!(h.session.state(), BannerState::Idle);
}
