// 核心模块
pub mod chart;
pub mod client;
pub mod config;
pub mod core;
pub mod opportunity;
pub mod orderbook;
pub mod page;

// 重新导出主要类型
pub use chart::{ChartComposer, ChartContainer, ChartFragment, GapPolicy};
pub use config::{ChartConfig, ChartLayout, ConfigManager, GlobalConfig, SystemConfig};
pub use core::{ChartError, ChartResult};
pub use opportunity::{Opportunity, OpportunityQuery};
pub use orderbook::{Exchange, OrderBook, PriceLevel, Series, Snapshot};

/// 库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 初始化日志系统：级别来自配置（`RUST_LOG` 优先），配置了日志文件时写入文件
pub fn init_logging(system: &SystemConfig) {
    use std::fs::OpenOptions;

    let level = system
        .log_level
        .parse::<log::LevelFilter>()
        .unwrap_or(log::LevelFilter::Info);

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    if !system.log_file.is_empty() {
        match OpenOptions::new().create(true).append(true).open(&system.log_file) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("无法打开日志文件 {}: {}，改为输出到stderr", system.log_file, e),
        }
    }

    let _ = builder.try_init();
}
