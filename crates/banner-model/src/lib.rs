//! TicketShare Banner Model
//!
//! Defines the data contracts for the social banner:
//! - **Source:** which photo the attendee overlay shows, and the upload policy
//! - **Geometry:** fixed canvas, attendee circle, and name band layout
//! - **Props:** what the host application hands to a banner view
//! - **Share:** share statement templates and download filenames
//!
//! Geometry is expressed in absolute canvas pixels; the canvas never
//! changes size.

pub mod geometry;
pub mod props;
pub mod share;
pub mod source;

pub use geometry::*;
pub use props::*;
pub use share::*;
pub use source::*;
