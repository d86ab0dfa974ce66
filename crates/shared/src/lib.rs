mod date;
mod error;
mod event;

pub use date::*;
pub use error::*;
pub use event::*;
