pub mod raw;
pub mod transient;

pub use raw::RawRecord;
pub use transient::TransientRecord;
