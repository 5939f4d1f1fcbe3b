pub mod artifact;
pub mod downloads;
pub mod stats;
