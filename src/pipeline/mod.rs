pub mod extraction;
pub mod factcheck; // Response normalization + fallback recovery
