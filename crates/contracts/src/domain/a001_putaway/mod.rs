pub mod aggregate;
pub mod split_lines;

pub use aggregate::*;
pub use split_lines::{effective_quantity, expand_split_lines};
