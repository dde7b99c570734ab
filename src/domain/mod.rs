// Domain types and value objects
pub mod identity;
pub mod series;
pub mod tensor;

// Re-export commonly used types
pub use identity::{DerivativeKey, Direction, Operation};
pub use series::TimeSeries;
pub use tensor::DistributionTensor;
