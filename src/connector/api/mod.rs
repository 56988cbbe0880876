pub mod container;
pub mod controller;
pub mod router;

pub use container::{Container, ContainerConfig, DEFAULT_BOOK_PATH};
pub use router::Router;
