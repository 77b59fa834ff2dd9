//! Core abstractions shared by the analyzer, the diagram plugins and the
//! domain classifier

mod error;
pub mod logging;
mod renderer;
mod selection;
mod types;

pub use error::*;
pub use logging::*;
pub use renderer::*;
pub use selection::*;
pub use types::*;
