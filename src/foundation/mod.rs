/// Core value types: frame indices, rates, colors, goal boxes.
pub mod core;
/// Error taxonomy.
pub mod error;
/// Fixed-point channel arithmetic.
pub mod math;
