pub mod cubic;
pub mod path_command;
pub mod path_description;
pub mod sample;

pub use cubic::CubicPatch;
pub use path_command::{EllipticalArc, PathCommand};
pub use path_description::{PathDescription, PathElement};
pub use sample::{subpath_ranges, Sample, SampleKind};
