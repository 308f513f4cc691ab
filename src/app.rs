//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the catalog view,
//! selection, pane focus and mirrored playback state.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
