//! Long-lived services behind the widgets.
//!
//! Services are main-thread singletons. Widgets reach them through
//! `global()` accessors and subscribe to changes via [`callbacks`].

pub mod callbacks;
pub mod config_manager;
pub mod pipeline;
pub mod player;
pub mod state;
