pub mod categories;
pub mod generator;

pub use categories::Category;
pub use generator::generate;
