//! 图表容器
//!
//! 每次收到新数据时清空全部旧图表并按交易所顺序重新生成，不做增量比对。

use super::composer::ChartComposer;
use super::fragment::ChartFragment;
use crate::config::ChartConfig;
use crate::orderbook::{Exchange, Series};

pub struct ChartContainer {
    composer: ChartComposer,
    exchanges: Vec<Exchange>,
    fragments: Vec<ChartFragment>,
    /// 已完成的重建次数
    generation: u64,
}

impl ChartContainer {
    pub fn new(config: ChartConfig) -> Self {
        Self::with_exchanges(config, Exchange::ALL.to_vec())
    }

    pub fn with_exchanges(config: ChartConfig, exchanges: Vec<Exchange>) -> Self {
        Self {
            composer: ChartComposer::new(config),
            exchanges,
            fragments: Vec::new(),
            generation: 0,
        }
    }

    /// 新数据到达：丢弃旧图表，重新生成全部图表
    pub fn on_data(&mut self, series: &Series) -> &[ChartFragment] {
        self.fragments.clear();
        let fragments = self.composer.compose(series, &self.exchanges);
        self.fragments.extend(fragments);
        self.generation += 1;

        log::debug!(
            "图表重建 #{}: {} 个快照, {} 张图表",
            self.generation,
            series.len(),
            self.fragments.len()
        );
        &self.fragments
    }

    pub fn fragments(&self) -> &[ChartFragment] {
        &self.fragments
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }

    /// 渲染为 `<div class="chart">` 容器，内部依次排列各交易所的SVG
    pub fn to_html(&self) -> String {
        let mut html = String::from("<div class=\"chart\">");
        for fragment in &self.fragments {
            html.push_str(&fragment.to_svg());
        }
        html.push_str("</div>");
        html
    }
}

impl Default for ChartContainer {
    fn default() -> Self {
        Self::new(ChartConfig::default())
    }
}
