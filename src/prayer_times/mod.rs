pub mod calibrate;
pub mod overrides;
pub mod seasonal;

pub use calibrate::Calibrator;
pub use overrides::OverrideTable;
pub use seasonal::{SeasonalRow, SeasonalTable};
