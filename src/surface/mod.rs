// Surface relabeling is organized by concern
pub mod fields;
pub mod labels;
pub mod permute;
pub mod prefix;
pub mod substitute;

// Re-export the surface-level API
pub use fields::*;
pub use labels::*;
pub use permute::*;
pub use prefix::*;
pub use substitute::*;
