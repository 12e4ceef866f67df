//! Terminal UI module using ratatui.
//!
//! - `render`: Main frame rendering, layout and overlays
//! - `input`: Keyboard and mouse event handling
//! - `styles`: Color scheme and text styling
//! - `tabs`: Certificates and Showcase tab content

pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;
