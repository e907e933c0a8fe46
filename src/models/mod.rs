pub mod calculation;
pub mod settings;

pub use calculation::*;
pub use settings::*;
