//! 演示用快照序列生成器
//!
//! 每个交易所独立做随机游走，偶尔丢失某个交易所的订单簿，
//! 用于在没有后端数据时预览图表。

use chrono::{Duration, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{Exchange, OrderBook, PriceLevel, Series, Snapshot};

/// 生成器配置
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub start: NaiveDateTime,
    /// 相邻快照间隔（分钟）
    pub step_minutes: i64,
    pub base_price: f64,
    /// 每步价格波动上限（相对值）
    pub volatility: f64,
    /// 某个交易所在某个时刻缺失数据的概率
    pub missing_probability: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start: NaiveDateTime::default(),
            step_minutes: 1,
            base_price: 430.0,
            volatility: 0.002,
            missing_probability: 0.05,
            seed: 42,
        }
    }
}

pub struct SeriesGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl SeriesGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// 生成 `points` 个快照
    pub fn generate(&mut self, points: usize) -> Series {
        let mut mids: Vec<f64> = Exchange::ALL
            .iter()
            .map(|_| self.config.base_price * (1.0 + self.rng.gen_range(-0.01..0.01)))
            .collect();

        let mut snapshots = Vec::with_capacity(points);
        for i in 0..points {
            let timestamp = self.config.start + Duration::minutes(self.config.step_minutes * i as i64);
            let mut snapshot = Snapshot::new(timestamp);

            for (exchange, mid) in Exchange::ALL.iter().zip(mids.iter_mut()) {
                let drift = self.rng.gen_range(-self.config.volatility..=self.config.volatility);
                *mid *= 1.0 + drift;

                if self.rng.gen_bool(self.config.missing_probability) {
                    continue;
                }

                let half_spread = *mid * self.rng.gen_range(0.0005..0.005);
                let book = OrderBook::new(
                    vec![PriceLevel::new(round_cents(*mid - half_spread), self.random_volume())],
                    vec![PriceLevel::new(round_cents(*mid + half_spread), self.random_volume())],
                );
                snapshot.orderbooks.insert(*exchange, book);
            }

            snapshots.push(snapshot);
        }

        Series::new(snapshots)
    }

    fn random_volume(&mut self) -> f64 {
        round_cents(self.rng.gen_range(0.01..5.0))
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
