pub mod candidate;
pub mod vacancy;
