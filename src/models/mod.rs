pub mod event;
pub mod macros;
pub mod matches;
pub mod scoring;
pub mod time;

pub use event::*;
pub use matches::*;
pub use scoring::*;
pub use time::*;
