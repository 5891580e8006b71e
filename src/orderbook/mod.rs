// 订单簿快照数据模块

pub mod generator;
pub mod types;

pub use generator::{GeneratorConfig, SeriesGenerator};
pub use types::{
    parse_timestamp, Exchange, OrderBook, PriceLevel, RawOrderBook, RawSnapshot, Series, Side,
    Snapshot, TIMESTAMP_FORMAT,
};
