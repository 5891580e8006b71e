//! 跨交易所套利机会
//!
//! - query: 查询参数与URL读写
//! - table: 结果表格与搜索表单的HTML渲染
//! - 本文件：机会记录、从快照中检测套利机会、按查询参数过滤

pub mod query;
pub mod table;

pub use query::{OpportunityQuery, QueryError};
pub use table::{render_search_form, render_table};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::orderbook::{Exchange, PriceLevel, Series, Snapshot, TIMESTAMP_FORMAT};

/// 一条套利机会：在 `buy_exchanger` 以卖一价买入，在 `sell_exchanger` 以买一价卖出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Opportunity {
    pub date: String,
    /// 利润百分比
    pub spread: f64,
    pub buy_exchanger: String,
    pub ask: PriceLevel,
    pub sell_exchanger: String,
    pub bid: PriceLevel,
}

impl Opportunity {
    /// 可成交量（两边较小的数量）
    pub fn tradable_volume(&self) -> f64 {
        self.ask.volume.min(self.bid.volume)
    }

    /// 按可成交量计算的价差收益
    pub fn profit(&self) -> f64 {
        self.tradable_volume() * (self.bid.price - self.ask.price)
    }
}

/// 利润百分比：`100 * (bid / ask - 1)`
pub fn spread_percent(ask_price: f64, bid_price: f64) -> f64 {
    100.0 * (bid_price / ask_price - 1.0)
}

/// 扫描单个快照里所有交易所两两组合
pub fn detect_opportunities(snapshot: &Snapshot) -> Vec<Opportunity> {
    let date = snapshot.timestamp.format(TIMESTAMP_FORMAT).to_string();
    let mut found = Vec::new();

    for (i, first) in Exchange::ALL.iter().enumerate() {
        for second in &Exchange::ALL[i + 1..] {
            if let Some(opportunity) = detect_pair(snapshot, *first, *second, &date) {
                found.push(opportunity);
            }
        }
    }
    found
}

/// 扫描整段序列
pub fn detect_in_series(series: &Series) -> Vec<Opportunity> {
    series.iter().flat_map(detect_opportunities).collect()
}

fn detect_pair(snapshot: &Snapshot, first: Exchange, second: Exchange, date: &str) -> Option<Opportunity> {
    let first_book = snapshot.orderbook(first)?;
    let second_book = snapshot.orderbook(second)?;

    let candidates = [
        (first, first_book.best_ask(), second, second_book.best_bid()),
        (second, second_book.best_ask(), first, first_book.best_bid()),
    ];

    candidates.into_iter().find_map(|(buy, ask, sell, bid)| {
        let (ask, bid) = (ask?, bid?);
        (ask.price < bid.price).then(|| Opportunity {
            date: date.to_string(),
            spread: spread_percent(ask.price, bid.price),
            buy_exchanger: buy.to_string(),
            ask: *ask,
            sell_exchanger: sell.to_string(),
            bid: *bid,
        })
    })
}

/// 按最小利润过滤，按利润从高到低排序并截断
pub fn filter_opportunities(mut opportunities: Vec<Opportunity>, query: &OpportunityQuery) -> Vec<Opportunity> {
    if let Some(min_profit) = query.min_profit {
        opportunities.retain(|o| o.spread >= min_profit);
    }
    opportunities.sort_by_key(|o| std::cmp::Reverse(OrderedFloat(o.spread)));
    if let Some(limit) = query.limit {
        opportunities.truncate(limit);
    }
    opportunities
}
