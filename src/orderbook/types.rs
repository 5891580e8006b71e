//! 订单簿快照数据类型定义
//!
//! 外部数据以JSON数组形式提供（`StartDate` + `Orderbooks`），
//! 这里先反序列化为原始结构，再转换为强类型的 `Series`。

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::core::{ChartError, ChartResult};

/// 快照时间戳格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// 支持的交易所（顺序决定图表的纵向排列顺序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Exchange {
    Cex,
    Kraken,
    Btce,
    Hitbtc,
    Bitfinex,
}

impl Exchange {
    /// 固定的显示顺序，不从数据中推导
    pub const ALL: [Exchange; 5] = [
        Exchange::Cex,
        Exchange::Kraken,
        Exchange::Btce,
        Exchange::Hitbtc,
        Exchange::Bitfinex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Cex => "Cex",
            Exchange::Kraken => "Kraken",
            Exchange::Btce => "Btce",
            Exchange::Hitbtc => "Hitbtc",
            Exchange::Bitfinex => "Bitfinex",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exchange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Exchange::ALL
            .iter()
            .copied()
            .find(|exchange| exchange.as_str() == s)
            .ok_or_else(|| format!("unknown exchange '{}'", s))
    }
}

/// 订单簿方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Bids,
    Asks,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Bids => "bids",
            Side::Asks => "asks",
        }
    }
}

/// 价格档位
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriceLevel {
    pub price: f64,
    pub volume: f64,
}

impl PriceLevel {
    pub fn new(price: f64, volume: f64) -> Self {
        Self { price, volume }
    }
}

/// 单个交易所在某一时刻的订单簿（最优价在前）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBook {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl OrderBook {
    pub fn new(bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        Self { bids, asks }
    }

    /// 最优买价档位，空序列视为缺失
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// 最优卖价档位，空序列视为缺失
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    pub fn best(&self, side: Side) -> Option<&PriceLevel> {
        match side {
            Side::Bids => self.best_bid(),
            Side::Asks => self.best_ask(),
        }
    }
}

/// 某一时刻所有交易所的订单簿快照
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub timestamp: NaiveDateTime,
    pub orderbooks: HashMap<Exchange, OrderBook>,
}

impl Snapshot {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            orderbooks: HashMap::new(),
        }
    }

    pub fn with_orderbook(mut self, exchange: Exchange, book: OrderBook) -> Self {
        self.orderbooks.insert(exchange, book);
        self
    }

    pub fn orderbook(&self, exchange: Exchange) -> Option<&OrderBook> {
        self.orderbooks.get(&exchange)
    }

    /// 指定交易所、指定方向的最优价格；订单簿缺失或该方向为空时返回 None
    pub fn best_price(&self, exchange: Exchange, side: Side) -> Option<f64> {
        self.orderbook(exchange)
            .and_then(|book| book.best(side))
            .map(|level| level.price)
    }
}

/// 按时间升序排列的快照序列（顺序由调用方保证，不会重新排序）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    snapshots: Vec<Snapshot>,
}

impl Series {
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        Self { snapshots }
    }

    /// 从JSON快照数组解析
    pub fn from_json(json: &str) -> ChartResult<Self> {
        let raw: Vec<RawSnapshot> = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// 从已反序列化的 `serde_json::Value` 解析
    pub fn from_value(value: serde_json::Value) -> ChartResult<Self> {
        let raw: Vec<RawSnapshot> = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: Vec<RawSnapshot>) -> ChartResult<Self> {
        let snapshots = raw
            .into_iter()
            .map(RawSnapshot::into_snapshot)
            .collect::<ChartResult<Vec<_>>>()?;
        Ok(Self { snapshots })
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}

/// 解析快照时间戳，格式错误直接报错
pub fn parse_timestamp(value: &str) -> ChartResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|source| {
        ChartError::UnparsableDate {
            value: value.to_string(),
            source,
        }
    })
}

// ==================== 原始JSON结构 ====================

/// JSON中的快照记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSnapshot {
    #[serde(rename = "StartDate")]
    pub start_date: String,
    #[serde(rename = "Orderbooks", default)]
    pub orderbooks: Option<HashMap<String, RawOrderBook>>,
}

/// JSON中的订单簿记录，`Bids`/`Asks` 可能为 null 或缺失
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawOrderBook {
    #[serde(default)]
    pub bids: Option<Vec<PriceLevel>>,
    #[serde(default)]
    pub asks: Option<Vec<PriceLevel>>,
}

impl RawSnapshot {
    pub fn into_snapshot(self) -> ChartResult<Snapshot> {
        let timestamp = parse_timestamp(&self.start_date)?;
        let mut snapshot = Snapshot::new(timestamp);

        for (name, raw_book) in self.orderbooks.unwrap_or_default() {
            match name.parse::<Exchange>() {
                Ok(exchange) => {
                    let book = OrderBook::new(
                        raw_book.bids.unwrap_or_default(),
                        raw_book.asks.unwrap_or_default(),
                    );
                    snapshot.orderbooks.insert(exchange, book);
                }
                Err(e) => log::debug!("跳过未知交易所数据: {}", e),
            }
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exchange_order_and_names() {
        let names: Vec<&str> = Exchange::ALL.iter().map(|e| e.as_str()).collect();
        assert_eq!(names, vec!["Cex", "Kraken", "Btce", "Hitbtc", "Bitfinex"]);
        assert_eq!("Hitbtc".parse::<Exchange>(), Ok(Exchange::Hitbtc));
        assert!("Bter".parse::<Exchange>().is_err());
    }

    #[test]
    fn test_parse_series_from_json() {
        let data = json!([
            {
                "StartDate": "2024-01-01 00:00",
                "Orderbooks": {
                    "Cex": {"Bids": [{"Price": 100.0, "Volume": 1.0}], "Asks": [{"Price": 101.0, "Volume": 2.0}]},
                    "Bter": {"Bids": [{"Price": 1.0, "Volume": 1.0}], "Asks": []}
                }
            },
            {"StartDate": "2024-01-01 00:05", "Orderbooks": null}
        ]);

        let series = Series::from_value(data).unwrap();
        assert_eq!(series.len(), 2);

        let first = &series.snapshots()[0];
        assert_eq!(first.orderbooks.len(), 1);
        assert_eq!(first.best_price(Exchange::Cex, Side::Bids), Some(100.0));
        assert_eq!(first.best_price(Exchange::Cex, Side::Asks), Some(101.0));
        assert!(series.snapshots()[1].orderbooks.is_empty());
    }

    #[test]
    fn test_empty_side_is_missing_not_error() {
        let data = json!([
            {"StartDate": "2024-01-01 00:00", "Orderbooks": {"Kraken": {"Bids": [], "Asks": null}}}
        ]);
        let series = Series::from_value(data).unwrap();
        let snapshot = &series.snapshots()[0];

        assert!(snapshot.orderbook(Exchange::Kraken).is_some());
        assert_eq!(snapshot.best_price(Exchange::Kraken, Side::Bids), None);
        assert_eq!(snapshot.best_price(Exchange::Kraken, Side::Asks), None);
        assert!(snapshot.orderbook(Exchange::Cex).is_none());
    }

    #[test]
    fn test_malformed_timestamp_fails_loudly() {
        let data = json!([{"StartDate": "2024/01/01 00:00", "Orderbooks": {}}]);
        match Series::from_value(data) {
            Err(ChartError::UnparsableDate { value, .. }) => assert_eq!(value, "2024/01/01 00:00"),
            other => panic!("expected UnparsableDate, got {:?}", other),
        }
    }

    #[test]
    fn test_order_is_preserved() {
        let data = json!([
            {"StartDate": "2024-01-01 00:10"},
            {"StartDate": "2024-01-01 00:00"}
        ]);
        let series = Series::from_value(data).unwrap();
        assert_eq!(series.snapshots()[0].timestamp, parse_timestamp("2024-01-01 00:10").unwrap());
        assert_eq!(series.snapshots()[1].timestamp, parse_timestamp("2024-01-01 00:00").unwrap());
    }
}
