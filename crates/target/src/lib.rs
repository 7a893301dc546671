//! Target resolution: from a screen point and the event's own target to the element whose
//! text the user is pointing at.
//!
//! Five strategies run in order and the first hit wins. Only the first one is a direct hit;
//! anything found by a later strategy is reported as forced.

#![forbid(unsafe_code)]

mod config;
mod heuristics;
mod resolver;

pub use config::TargetConfig;
pub use heuristics::{MEDIA_TAGS, TEXT_TAGS, is_text_tag};
pub use resolver::{Strategy, TargetResolution, TargetResolver};
