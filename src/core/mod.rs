// 核心模块
pub mod error;

pub use error::{ChartError, ChartResult};
