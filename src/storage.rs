mod dataset;
mod workspace;

pub use dataset::{Dataset, DatasetError};
pub use workspace::{InitError, Workspace};
