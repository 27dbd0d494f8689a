/// Route module for rule patterns
///
/// Contains the pure segment grammar used to classify pattern tokens.

pub mod segment;

// Re-export commonly used types
pub use segment::{
    classify_segment, default_value, is_dynamic, is_optional, is_wildcard, parameter_name,
    regex_constraint, Constraint, Parameter, Segment,
};
