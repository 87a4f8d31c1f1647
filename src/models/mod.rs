pub mod artifact;
pub mod edit;
pub mod image;
pub mod request;
pub mod storage;
pub mod text;

pub use artifact::*;
pub use edit::*;
pub use image::*;
pub use request::*;
pub use storage::*;
pub use text::*;
