pub mod certificates;
pub mod showcase;
