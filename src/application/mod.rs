pub mod group_service;
pub mod group_tree;
pub mod student_service;

#[cfg(test)]
pub(crate) mod test_support;
