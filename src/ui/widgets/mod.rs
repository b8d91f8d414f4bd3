pub mod sparkline;

pub use sparkline::{sparkline_text, TrendSparkline};
