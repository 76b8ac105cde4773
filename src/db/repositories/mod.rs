pub mod captures;
pub mod preferences;
