//! Business logic services.

pub mod applications;

pub use applications::ApplicationService;
