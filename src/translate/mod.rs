pub mod error;
pub mod interface;
pub mod prompt;
pub mod translator;

pub use error::*;
pub use interface::*;
pub use translator::*;
