//! 图表组装器
//!
//! 按固定交易所顺序，为每个交易所构建比例尺、坐标轴和买卖价格线。
//! 单个交易所失败（例如整段序列都没有数据）只会得到一张空图表，不影响其他交易所。

use super::axis::{Axis, AxisOrient};
use super::fragment::ChartFragment;
use super::scale::{ScaleSet, TimeScale};
use super::series::{render_line, LinePath};
use crate::config::ChartConfig;
use crate::core::{ChartError, ChartResult};
use crate::orderbook::{Exchange, Series, Side};

#[derive(Debug, Clone, Default)]
pub struct ChartComposer {
    config: ChartConfig,
}

impl ChartComposer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// 为全部交易所生成图表
    pub fn render(&self, series: &Series) -> Vec<ChartFragment> {
        self.compose(series, &Exchange::ALL)
    }

    /// 按给定顺序为每个交易所生成一张图表，失败的交易所退化为空图表
    pub fn compose(&self, series: &Series, exchanges: &[Exchange]) -> Vec<ChartFragment> {
        exchanges
            .iter()
            .map(|&exchange| match self.compose_exchange(series, exchange) {
                Ok(fragment) => fragment,
                Err(e) if e.is_recoverable() => {
                    log::warn!("{} 图表退化为空图表: {}", exchange, e);
                    self.empty_fragment(series, exchange)
                }
                Err(e) => {
                    log::error!("{} 图表渲染失败: {}", exchange, e);
                    self.empty_fragment(series, exchange)
                }
            })
            .collect()
    }

    /// 严格模式：区间退化时返回错误
    pub fn compose_exchange(&self, series: &Series, exchange: Exchange) -> ChartResult<ChartFragment> {
        let layout = self.config.layout;
        let scales = ScaleSet::build(series, exchange, layout.inner_width(), layout.inner_height())?;

        let (y_min, y_max) = scales.y.domain();
        if !y_min.is_finite() || !y_max.is_finite() {
            return Err(ChartError::DegenerateDomain { exchange });
        }

        let x_axis = Axis::bottom(
            &scales.x,
            self.config.x_tick_minutes,
            &self.config.x_tick_format,
            layout.inner_height(),
        )?;
        let y_axis = Axis::left(&scales.y, self.config.y_tick_count, self.config.y_label.clone());

        let lines = [Side::Bids, Side::Asks]
            .into_iter()
            .map(|side| {
                render_line(&scales, series, exchange, side, self.config.gap_policy, self.color(side))
            })
            .collect();

        Ok(ChartFragment {
            exchange,
            layout,
            x_axis,
            y_axis,
            lines,
            x_domain: Some(scales.x.domain()),
            y_domain: Some(scales.y.domain()),
        })
    }

    fn empty_fragment(&self, series: &Series, exchange: Exchange) -> ChartFragment {
        let layout = self.config.layout;
        let x_domain = TimeScale::from_series(series, layout.inner_width())
            .ok()
            .map(|scale| scale.domain());

        ChartFragment {
            exchange,
            layout,
            x_axis: Axis::empty(
                AxisOrient::Bottom,
                (0.0, layout.inner_width()),
                (0.0, layout.inner_height()),
            ),
            y_axis: Axis::empty(AxisOrient::Left, (0.0, layout.inner_height()), (0.0, 0.0)),
            lines: vec![
                LinePath::empty(Side::Bids, self.color(Side::Bids)),
                LinePath::empty(Side::Asks, self.color(Side::Asks)),
            ],
            x_domain,
            y_domain: None,
        }
    }

    fn color(&self, side: Side) -> &str {
        match side {
            Side::Bids => &self.config.colors.bid_color,
            Side::Asks => &self.config.colors.ask_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::GapPolicy;
    use serde_json::json;

    fn two_point_series() -> Series {
        Series::from_value(json!([
            {"StartDate": "2024-01-01 00:00", "Orderbooks": {"Cex": {"Bids": [{"Price": 100, "Volume": 1}], "Asks": [{"Price": 101, "Volume": 1}]}}},
            {"StartDate": "2024-01-01 00:05", "Orderbooks": {"Cex": {"Bids": [{"Price": 102, "Volume": 1}], "Asks": [{"Price": 103, "Volume": 1}]}}}
        ]))
        .unwrap()
    }

    #[test]
    fn test_compose_exchange_strict_reports_degenerate() {
        let composer = ChartComposer::default();
        let series = two_point_series();
        assert!(composer.compose_exchange(&series, Exchange::Cex).is_ok());
        assert!(matches!(
            composer.compose_exchange(&series, Exchange::Kraken),
            Err(ChartError::DegenerateDomain { exchange: Exchange::Kraken })
        ));
    }

    #[test]
    fn test_lines_are_bids_then_asks() {
        let composer = ChartComposer::default();
        let fragment = composer.compose_exchange(&two_point_series(), Exchange::Cex).unwrap();
        assert_eq!(fragment.lines[0].side, Side::Bids);
        assert_eq!(fragment.lines[0].color, "steelblue");
        assert_eq!(fragment.lines[1].side, Side::Asks);
        assert_eq!(fragment.lines[1].color, "#FC9E27");
    }

    #[test]
    fn test_compose_respects_given_order() {
        let composer = ChartComposer::new(ChartConfig::default().with_gap_policy(GapPolicy::Break));
        let order = [Exchange::Bitfinex, Exchange::Cex];
        let fragments = composer.compose(&two_point_series(), &order);
        let exchanges: Vec<Exchange> = fragments.iter().map(|f| f.exchange).collect();
        assert_eq!(exchanges, order.to_vec());
        assert!(fragments[0].is_degenerate());
        assert!(!fragments[1].is_degenerate());
    }

    #[test]
    fn test_empty_series_yields_empty_charts() {
        let fragments = ChartComposer::default().render(&Series::default());
        assert_eq!(fragments.len(), 5);
        assert!(fragments.iter().all(|f| f.is_degenerate() && f.x_domain.is_none()));
    }

    #[test]
    fn test_bad_tick_format_does_not_panic() {
        let config = ChartConfig {
            x_tick_format: "%Q".to_string(),
            ..Default::default()
        };
        let composer = ChartComposer::new(config);
        let series = two_point_series();

        assert!(matches!(
            composer.compose_exchange(&series, Exchange::Cex),
            Err(ChartError::InvalidTickFormat { .. })
        ));
        let fragments = composer.render(&series);
        assert_eq!(fragments.len(), 5);
        assert!(fragments.iter().all(|f| f.is_degenerate()));
    }
}
