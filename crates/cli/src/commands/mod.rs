pub mod compare;
pub mod documents;
pub mod servers;
pub mod util;

pub use compare::*;
pub use documents::*;
pub use servers::*;
pub use util::*;
