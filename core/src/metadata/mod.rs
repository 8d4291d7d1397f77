pub mod energy;
pub mod field;
pub mod store;

pub use energy::{energy_density, InstrumentConfig};
pub use field::{unit_of, MetadataField};
pub use store::{FieldValue, MetadataStore};
