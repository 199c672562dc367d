pub mod builder;
pub mod document;
pub mod layout;
pub mod render;

pub use crate::domain::ports::{Renderer, Storage, Trim, Viewer};
pub use crate::utils::error::Result;
