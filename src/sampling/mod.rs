pub mod region;
pub mod sampler;

pub use region::{region_for, Region};
pub use sampler::{hue_degrees, luma, sample_scene};
