//! Service layer for the complaint monitor.
//!
//! This module contains the logic for:
//! - Label parsing (`parse_label`, `parse_labels`)
//! - Page rendering (`Renderer`, `HttpRenderer`)

mod labels;
mod renderer;

pub use labels::{NoMatch, ParsedLabels, parse_label, parse_labels};
pub use renderer::{HttpRenderer, RenderSession, Renderer, extract_labels};
