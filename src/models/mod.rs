pub mod analytics;
pub mod category;
pub mod expense;

pub use analytics::*;
pub use category::*;
pub use expense::*;
