pub mod address;
pub mod error;
pub mod offset;
pub mod range;
pub mod sheet;

pub use error::*;
pub use offset::*;
pub use range::*;
pub use sheet::*;
