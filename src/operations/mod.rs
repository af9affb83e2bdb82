mod fit_plane;
mod intersect_box;

pub use fit_plane::{FitPlane, FIT_RELATIVE_EPSILON};
pub use intersect_box::IntersectBox;
