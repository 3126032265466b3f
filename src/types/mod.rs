mod dataset;
mod geo_type;
mod variable;
mod year_var;

pub use dataset::Dataset;
pub use geo_type::{GeographyLevel, Stability};
pub use variable::{Variable, VariableSpec, YearCodes};
pub use year_var::YearVar;
