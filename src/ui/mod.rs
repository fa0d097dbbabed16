//! User interface layer
//!
//! The table component owns the view state and turns events into a
//! `RenderedTable`; the renderers draw that model as text or a ratatui widget.

pub mod render_model;
pub mod table_component;
pub mod table_renderer;
pub mod table_widget;
