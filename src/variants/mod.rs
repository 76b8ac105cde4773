pub mod kinds;
pub mod renderer;

pub use kinds::VariantKind;
pub use renderer::{render_variants, CaptureVariant, VariantSet};
