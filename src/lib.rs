//! Terminal map of a region's districts. Clicking a district highlights it
//! and opens a popup with an SVG thumbnail of its outline.

pub mod app;
pub mod braille;
pub mod data;
pub mod map;
pub mod selection;
pub mod shape;
pub mod style;
pub mod thumbnail;
pub mod ui;
