//! 单个交易所的完整图表片段

use chrono::NaiveDateTime;

use super::axis::Axis;
use super::series::LinePath;
use super::svg::{translate, SvgNode, SVG_NAMESPACE};
use crate::config::ChartLayout;
use crate::orderbook::{Exchange, Side};

#[derive(Debug, Clone, PartialEq)]
pub struct ChartFragment {
    pub exchange: Exchange,
    pub layout: ChartLayout,
    pub x_axis: Axis,
    pub y_axis: Axis,
    /// 先买价线，后卖价线
    pub lines: Vec<LinePath>,
    pub x_domain: Option<(NaiveDateTime, NaiveDateTime)>,
    pub y_domain: Option<(f64, f64)>,
}

impl ChartFragment {
    /// 价格区间是否退化（没有任何数据）
    pub fn is_degenerate(&self) -> bool {
        self.y_domain.is_none() || self.x_domain.is_none()
    }

    pub fn line(&self, side: Side) -> Option<&LinePath> {
        self.lines.iter().find(|line| line.side == side)
    }

    pub fn to_svg_node(&self) -> SvgNode {
        let margin = self.layout.margin;

        let paths = self.lines.iter().map(|line| {
            SvgNode::new("path")
                .attr("class", format!("line {}", line.side.as_str()))
                .attr("d", line.path_data())
                .attr("stroke", line.color.clone())
                .attr("fill", "none")
        });

        let container = SvgNode::new("g")
            .attr("transform", translate(margin.left, margin.top))
            .child(self.x_axis.to_svg())
            .child(self.y_axis.to_svg())
            .children(paths);

        SvgNode::new("svg")
            .attr("xmlns", SVG_NAMESPACE)
            .attr("class", format!("exchange-chart {}", self.exchange.as_str().to_lowercase()))
            .attr("width", self.layout.width.to_string())
            .attr("height", self.layout.height.to_string())
            .child(
                SvgNode::new("title").text(self.exchange.as_str()),
            )
            .child(container)
    }

    pub fn to_svg(&self) -> String {
        self.to_svg_node().render()
    }
}
