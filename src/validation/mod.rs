pub mod fields;
pub mod references;
pub mod uniqueness;
