pub mod winner;
pub mod error;
pub mod placement;

pub use winner::*;
pub use error::*;
pub use placement::*;
