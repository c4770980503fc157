pub mod cv;
pub mod image;
