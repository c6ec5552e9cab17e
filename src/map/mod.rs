mod geometry;
mod projection;
mod renderer;
mod spatial;

pub use geometry::{draw_ring, fill_polygon};
pub use projection::{Viewport, MAX_ZOOM, MIN_ZOOM};
pub use renderer::{DistrictRenderer, MapLayers, StyledLayer};
