/// State management module
///
/// This module holds all gallery state, free of any UI or network types:
/// - Image records and file-name metadata (data.rs)
/// - The catalog and its category filter (catalog.rs)
/// - Masonry columns and the breakpoint table (layout.rs)
/// - Batch bookkeeping for incremental loading (loader.rs)
/// - The full-screen viewer state machine (navigator.rs)
/// - Category buttons (router.rs)
/// - The controller tying them together (controller.rs)

pub mod catalog;
pub mod controller;
pub mod data;
pub mod layout;
pub mod loader;
pub mod navigator;
pub mod router;
