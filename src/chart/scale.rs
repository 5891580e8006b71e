//! 坐标比例尺
//!
//! - `TimeScale`：时间 → 像素，值域 `[0, width]`
//! - `LinearScale`：价格 → 像素，值域 `[height, 0]`（价格越高像素y越小）
//! - 刻度生成：时间轴按固定分钟间隔，价格轴固定刻度数量

use std::fmt::Write;

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use ordered_float::OrderedFloat;

use crate::core::{ChartError, ChartResult};
use crate::orderbook::{Exchange, Series, Side};

/// 价格区间上下各留出的比例
pub const PRICE_PADDING_RATIO: f64 = 0.1;

/// 坐标轴刻度
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    /// 像素位置
    pub position: f64,
    pub label: String,
}

/// 时间比例尺
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: NaiveDateTime,
    end: NaiveDateTime,
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, range: (f64, f64)) -> Self {
        Self { start, end, range }
    }

    /// 一次遍历求出序列的时间范围
    pub fn from_series(series: &Series, width: f64) -> ChartResult<Self> {
        let mut iter = series.iter().map(|snapshot| snapshot.timestamp);
        let first = iter.next().ok_or(ChartError::EmptySeries)?;
        let (start, end) = iter.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts)));
        Ok(Self::new(start, end, (0.0, width)))
    }

    pub fn domain(&self) -> (NaiveDateTime, NaiveDateTime) {
        (self.start, self.end)
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// 时间映射到像素；零宽度区间统一映射到值域起点
    pub fn map(&self, ts: NaiveDateTime) -> f64 {
        let span = (self.end - self.start).num_milliseconds() as f64;
        if span == 0.0 {
            return self.range.0;
        }
        let offset = (ts - self.start).num_milliseconds() as f64;
        self.range.0 + offset / span * (self.range.1 - self.range.0)
    }

    /// 区间内（含两端）的刻度时刻：从当天零点起每隔 `interval_minutes` 分钟一个
    pub fn ticks(&self, interval_minutes: u32) -> Vec<NaiveDateTime> {
        if interval_minutes == 0 {
            return Vec::new();
        }

        let step = i64::from(interval_minutes);
        let first = ceil_to_minute(self.start);
        let midnight = first.date().and_time(NaiveTime::default());
        let elapsed = (first - midnight).num_minutes();
        let aligned = (elapsed + step - 1) / step * step;

        let mut current = midnight + Duration::minutes(aligned);
        let mut ticks = Vec::new();
        while current <= self.end {
            ticks.push(current);
            current += Duration::minutes(step);
        }
        ticks
    }

    pub fn axis_ticks(&self, interval_minutes: u32, format: &str) -> ChartResult<Vec<AxisTick>> {
        self.ticks(interval_minutes)
            .into_iter()
            .map(|ts| {
                let mut label = String::new();
                write!(label, "{}", ts.format(format)).map_err(|_| ChartError::InvalidTickFormat {
                    format: format.to_string(),
                })?;
                Ok(AxisTick {
                    position: self.map(ts),
                    label,
                })
            })
            .collect()
    }
}

fn ceil_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    let floored = ts
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts);
    if floored < ts {
        floored + Duration::minutes(1)
    } else {
        floored
    }
}

/// 线性比例尺
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// 价格比例尺：最低买价到最高卖价，上下各留10%空间
    pub fn for_prices(series: &Series, exchange: Exchange, height: f64) -> ChartResult<Self> {
        let domain = price_domain(series, exchange).ok_or(ChartError::DegenerateDomain { exchange })?;
        Ok(Self::new(domain, (height, 0.0)))
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn map(&self, value: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 {
            return self.range.0;
        }
        self.range.0 + (value - self.domain.0) / span * (self.range.1 - self.range.0)
    }

    /// 均匀分布的 `count` 个刻度（包含区间两端）
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = self.domain;
        match count {
            0 => Vec::new(),
            1 => vec![(lo + hi) / 2.0],
            _ => {
                let step = (hi - lo) / (count - 1) as f64;
                (0..count).map(|i| lo + step * i as f64).collect()
            }
        }
    }

    pub fn axis_ticks(&self, count: usize) -> Vec<AxisTick> {
        let ticks = self.ticks(count);
        let step = if ticks.len() > 1 { ticks[1] - ticks[0] } else { 0.0 };
        ticks
            .into_iter()
            .map(|value| AxisTick {
                position: self.map(value),
                label: format_tick(value, step),
            })
            .collect()
    }
}

/// 计算价格区间；交易所在整个序列中没有买价或卖价时返回 None
///
/// 买卖交叉（最低买价高于最高卖价）时改用两侧所有报价的最小/最大值，保证区间非反向。
pub fn price_domain(series: &Series, exchange: Exchange) -> Option<(f64, f64)> {
    let prices = move |side: Side| {
        series
            .iter()
            .filter_map(move |snapshot| snapshot.best_price(exchange, side))
            .map(OrderedFloat)
    };

    let mut low = prices(Side::Bids).min()?.into_inner();
    let mut high = prices(Side::Asks).max()?.into_inner();
    if low > high {
        log::warn!("{} 买卖价交叉: 最低买价 {} > 最高卖价 {}", exchange, low, high);
        let all = || prices(Side::Bids).chain(prices(Side::Asks));
        low = all().min()?.into_inner();
        high = all().max()?.into_inner();
    }

    let delta = (high - low) * PRICE_PADDING_RATIO;
    Some((low - delta, high + delta))
}

/// 默认数值格式：千位分隔符，小数位数由刻度间隔决定
pub fn format_tick(value: f64, step: f64) -> String {
    let precision = if step > 0.0 && step.is_finite() {
        ((-step.log10()).ceil() + 1.0).clamp(0.0, 8.0) as usize
    } else {
        2
    };
    format_with_separators(value, precision)
}

fn format_with_separators(value: f64, precision: usize) -> String {
    let formatted = format!("{:.*}", precision, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        grouped.insert(0, '-');
    }
    grouped
}

/// 单个交易所图表的一组比例尺
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleSet {
    pub x: TimeScale,
    pub y: LinearScale,
}

impl ScaleSet {
    pub fn build(series: &Series, exchange: Exchange, width: f64, height: f64) -> ChartResult<Self> {
        Ok(Self {
            x: TimeScale::from_series(series, width)?,
            y: LinearScale::for_prices(series, exchange, height)?,
        })
    }
}
