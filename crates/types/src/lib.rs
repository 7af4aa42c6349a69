pub mod attempt;
pub mod batch;
pub mod error;
pub mod failure;
pub mod recipient;
pub mod report;
pub mod unit;

pub use attempt::*;
pub use batch::*;
pub use error::*;
pub use failure::*;
pub use recipient::*;
pub use report::*;
pub use unit::*;

/// Default number of recipients combined into one atomic submission
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default attempt ceiling for each retry pass
pub const DEFAULT_MAX_RETRIES: u32 = 10;
