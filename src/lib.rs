pub mod commands;
pub mod error;
pub mod util;

pub use commands::logic;
pub use error::{ErrorKind, LogicError, LogicResult};
