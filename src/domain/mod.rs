pub mod group;
pub mod student;
