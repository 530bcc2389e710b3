//! Project directory abstraction for testable file access

mod dockerfile;
mod local;
mod mock;
mod r#trait;

pub use dockerfile::count_stages;
pub use local::LocalProjectDirectory;
pub use mock::MockProjectDirectory;
pub use r#trait::{ProjectDirectory, ProjectError, ProjectFile};
