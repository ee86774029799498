pub mod catalog;
pub mod geometry;
pub mod keys;
pub mod row;

pub use catalog::*;
pub use geometry::*;
pub use keys::*;
pub use row::*;
