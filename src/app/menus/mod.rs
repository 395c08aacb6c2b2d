pub mod catalog;
pub mod screens;

pub use catalog::Catalog;
pub use screens::MenuRegistry;
