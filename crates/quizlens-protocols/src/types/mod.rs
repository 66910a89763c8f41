//! Value types exchanged between pipeline components.

mod question;
mod request;
mod result;

pub use question::*;
pub use request::*;
pub use result::*;
