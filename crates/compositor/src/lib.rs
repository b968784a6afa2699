//! TicketShare Compositor
//!
//! Renders the shareable "I'm attending" banner off-screen. Every call
//! gets its own raster surface; nothing is shared between compositions.
//!
//! # Pipeline
//!
//! ```text
//! background URI ──► load ──► stretch-fill 1200×630
//!                                   │
//! attendee URI ─────► load ──► circle clip + white ring
//!                                   │
//! display name ──────────────► name band + caption
//!                                   │
//!                                   ▼
//!                              PNG encode
//! ```

pub mod engine;
pub mod error;
pub mod loader;
pub mod surface;
pub mod text;

pub use engine::*;
pub use error::*;
