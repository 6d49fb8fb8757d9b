pub mod scale;
pub mod series;
pub mod ticks;
pub mod types;

pub use scale::LinearScale;
pub use series::{Series, SeriesSet};
pub use ticks::{AxisTicks, calibrate};
pub use types::{DataPoint, ValueRange, Viewport};
