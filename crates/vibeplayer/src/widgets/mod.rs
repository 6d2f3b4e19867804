//! Widget implementations for the vibeplayer window.
//!
//! Each widget is a self-contained GTK4 component. Widgets read the
//! current player snapshot when they are built and subscribe to the
//! services for every change after; dropping a widget disconnects its
//! callbacks again.

mod controls;
mod player_view;
mod rate_menu;
mod timeline;

pub mod css;

pub use player_view::PlayerView;
