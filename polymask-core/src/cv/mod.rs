pub mod color;
pub mod composite;
pub mod points;

pub use color::hex_to_rgb;
pub use composite::alpha_composite;
pub use points::{fill_polygon_mut, parse_polygon_points};
