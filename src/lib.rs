// Core of the isometric tile world editor. Everything outside the
// `desktop` feature is headless and driven through the collaborator
// traits in `app::input` and `render`.

pub mod log;
pub mod utils;
pub mod app;
pub mod render;
pub mod tile;
pub mod save;
pub mod engine;
pub mod level;
pub mod editor;

#[cfg(feature = "desktop")]
pub mod ui;
