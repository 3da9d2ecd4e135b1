pub mod generation;
pub mod grammar;
pub mod precision;
