pub mod crop;
pub mod dc;
pub mod flip;
pub mod lowpass;
pub mod normalize;
pub mod pipeline;
pub mod shift;

pub use dc::RemoveDcStage;
pub use flip::{FlipTimeStage, FlipTraceStage};
pub use lowpass::LowPassStage;
pub use normalize::NormalizeStage;
pub use pipeline::CleaningPipeline;
pub use shift::ShiftStage;
