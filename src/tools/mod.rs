pub mod catalog_info;
pub mod search;

pub use catalog_info::*;
pub use search::*;
