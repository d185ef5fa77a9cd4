/* mod declaration */
pub mod sequential;

pub use sequential::*;
