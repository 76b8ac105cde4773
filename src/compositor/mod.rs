pub mod compose;
pub mod css;
pub mod pixel;
pub mod presets;

pub use compose::{compose, ComposedFilters, CompositionInput};
pub use css::filter_string;
pub use pixel::apply_filters;
pub use presets::{ModePreset, DEFAULT_MODE};
