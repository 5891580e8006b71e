//! 买卖价格线渲染
//!
//! 每个快照对应一个点 `(x(时间), y(最优价))`。订单簿缺失时的处理方式由
//! `GapPolicy` 决定：按0价格绘制（线条掉到0），或者在该处断开线条。

use serde::{Deserialize, Serialize};

use super::scale::ScaleSet;
use super::svg::fmt_coord;
use crate::orderbook::{Exchange, Series, Side};

/// 缺失数据处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// 缺失点按价格0绘制
    #[default]
    ZeroDip,
    /// 缺失点断开线条
    Break,
}

/// 一条价格线，由若干连续子路径组成
#[derive(Debug, Clone, PartialEq)]
pub struct LinePath {
    pub side: Side,
    pub color: String,
    pub segments: Vec<Vec<(f64, f64)>>,
}

impl LinePath {
    pub fn empty(side: Side, color: &str) -> Self {
        Self {
            side,
            color: color.to_string(),
            segments: Vec::new(),
        }
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    pub fn points(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.segments.iter().flatten()
    }

    /// SVG path 的 `d` 属性，例如 `M0,90L730,0`
    pub fn path_data(&self) -> String {
        let mut d = String::new();
        for segment in &self.segments {
            for (i, (x, y)) in segment.iter().enumerate() {
                d.push(if i == 0 { 'M' } else { 'L' });
                d.push_str(&fmt_coord(*x));
                d.push(',');
                d.push_str(&fmt_coord(*y));
            }
        }
        d
    }
}

/// 绘制单个交易所单个方向的价格线
pub fn render_line(
    scales: &ScaleSet,
    series: &Series,
    exchange: Exchange,
    side: Side,
    gap_policy: GapPolicy,
    color: &str,
) -> LinePath {
    let mut line = LinePath::empty(side, color);
    let mut current: Vec<(f64, f64)> = Vec::new();

    for snapshot in series {
        let x = scales.x.map(snapshot.timestamp);
        match (snapshot.best_price(exchange, side), gap_policy) {
            (Some(price), _) => current.push((x, scales.y.map(price))),
            (None, GapPolicy::ZeroDip) => current.push((x, scales.y.map(0.0))),
            (None, GapPolicy::Break) => {
                if !current.is_empty() {
                    line.segments.push(std::mem::take(&mut current));
                }
            }
        }
    }

    if !current.is_empty() {
        line.segments.push(current);
    }
    line
}
