// Domain models

mod container;
mod sort;

pub use container::{ContainerSample, RawSample};
pub use sort::SortMode;
