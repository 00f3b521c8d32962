mod mask;
mod overlay;

pub use mask::MaskLayer;

pub use overlay::CompositeOutcome;
pub use overlay::JobReport;
pub use overlay::composite_image;
pub use overlay::draw_masks;
pub use overlay::remove_source;
