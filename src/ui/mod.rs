/// View helpers for the iced application
///
/// - The category header and theme toggle (header.rs)
/// - The masonry grid (grid.rs)
/// - The full-screen viewer overlay (modal.rs)

pub mod grid;
pub mod header;
pub mod modal;
