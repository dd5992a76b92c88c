// ABOUTME: Validated domain types shared across the crate.
// ABOUTME: Container identifiers and parsed image references.

mod id;
mod image_ref;

pub use id::ContainerId;
pub use image_ref::{ImageRef, ParseImageRefError};
