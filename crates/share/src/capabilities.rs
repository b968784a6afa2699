//! Capability detection for export and sharing.

use std::path::Path;

use ticketshare_common::config::AppConfig;

use crate::clipboard::ArboardClipboard;

/// A platform capability that banner export or sharing may need.
#[derive(Debug, Clone)]
pub struct Capability {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub required: bool,
    pub fix_instructions: Option<String>,
}

/// Check export/share capabilities for the given configuration.
pub fn check_capabilities(config: &AppConfig) -> Vec<Capability> {
    vec![
        check_downloads_dir(&config.export.downloads_dir),
        check_clipboard(),
        check_native_share(),
        check_page_url(config),
    ]
}

/// The downloads directory exists and is writable, or can be created.
fn check_downloads_dir(dir: &Path) -> Capability {
    let available = if dir.exists() {
        std::fs::metadata(dir)
            .map(|m| m.is_dir() && !m.permissions().readonly())
            .unwrap_or(false)
    } else {
        dir.ancestors()
            .skip(1)
            .find(|p| p.exists())
            .and_then(|p| std::fs::metadata(p).ok())
            .map(|m| !m.permissions().readonly())
            .unwrap_or(false)
    };

    Capability {
        name: "Downloads Directory".to_string(),
        description: format!("Banner downloads are written to {}", dir.display()),
        available,
        required: true,
        fix_instructions: if available {
            None
        } else {
            Some("Set export.downloads_dir in the config to a writable directory".to_string())
        },
    }
}

fn check_clipboard() -> Capability {
    clipboard_capability(ArboardClipboard::new().is_ok())
}

fn clipboard_capability(available: bool) -> Capability {
    Capability {
        name: "Clipboard".to_string(),
        description: "Share fallback copies the event link to the clipboard".to_string(),
        available,
        required: false,
        fix_instructions: if available {
            None
        } else {
            Some("Run inside a desktop session (X11 or Wayland)".to_string())
        },
    }
}

fn check_native_share() -> Capability {
    Capability {
        name: "Native Share Sheet".to_string(),
        description: "Platform share surface for sending the banner file".to_string(),
        available: false, // no desktop share sheet backend
        required: false,
        fix_instructions: Some(
            "Not available on this platform; sharing falls back to the clipboard".to_string(),
        ),
    }
}

fn check_page_url(config: &AppConfig) -> Capability {
    let available = config.share.page_url.is_some();
    Capability {
        name: "Share Link".to_string(),
        description: "Event page URL used by the clipboard fallback".to_string(),
        available,
        required: false,
        fix_instructions: if available {
            None
        } else {
            Some("Set share.page_url in the config or pass --page-url".to_string())
        },
    }
}

/// Print a user-friendly capability report.
pub fn print_capability_report(capabilities: &[Capability]) {
    println!("TicketShare Capabilities:");
    println!("{}", "-".repeat(60));

    for cap in capabilities {
        let status = if cap.available {
            "[OK]"
        } else if cap.required {
            "[MISSING - REQUIRED]"
        } else {
            "[MISSING - OPTIONAL]"
        };

        println!("  {} {}: {}", status, cap.name, cap.description);

        if let Some(ref fix) = cap.fix_instructions {
            println!("    Fix: {fix}");
        }
    }
}
