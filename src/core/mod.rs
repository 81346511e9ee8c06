pub mod fiesta;
pub mod probes;
pub mod report;
pub mod scoring;

pub use crate::domain::model::{Fault, FaultKind, FiestaReport, ScoreBreakdown, ScoreInput};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
