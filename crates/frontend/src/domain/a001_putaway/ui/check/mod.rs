pub mod columns;
pub mod model;
pub mod page;
pub mod row_tree;
pub mod state;
pub mod view_model;

pub use page::PutAwayCheckPage;
pub use row_tree::ExpandedState;
pub use state::{default_pivot_by, ResumeParams};
