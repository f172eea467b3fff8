pub mod ancestry;
pub mod group;
