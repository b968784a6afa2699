//! TicketShare banner session.
//!
//! One [`BannerSession`] backs one open banner view: it tracks which photo
//! the attendee picked, runs generation through the compositor, and drives
//! download and share for the resulting artifact.

pub mod resolver;
pub mod session;

pub use resolver::*;
pub use session::*;
