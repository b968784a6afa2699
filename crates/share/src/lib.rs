//! TicketShare artifact export and sharing.
//!
//! Generated banners are registered under short-lived `blob:` object URLs.
//! From there they can be downloaded to disk or handed to the platform's
//! share surface, with a clipboard fallback when no share surface exists.

pub mod capabilities;
pub mod clipboard;
pub mod dispatch;
pub mod export;
pub mod object_url;

pub use clipboard::{Clipboard, ClipboardError};
pub use dispatch::*;
pub use export::*;
pub use object_url::*;
