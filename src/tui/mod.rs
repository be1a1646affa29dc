//! Terminal UI: an Elm-style event loop over the shelf and chart views.

pub mod app;
pub mod events;
pub mod layout;
pub mod services;
pub mod sidebar;
pub mod theme;
pub mod views;
pub mod widgets;
