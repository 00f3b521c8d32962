mod annotations;
mod archive;

pub use annotations::{
    Annotations, ImageRecord, LabelColorTable, PolygonRecord, extract_colors, extract_images,
    filter_images_with_polygons,
};

pub use archive::extract_archive;
