//! 坐标轴：刻度位置 + 标签 + 轴线

use super::scale::{AxisTick, LinearScale, TimeScale};
use super::svg::{fmt_coord, translate, SvgNode};
use crate::core::ChartResult;

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrient {
    Bottom,
    Left,
}

impl AxisOrient {
    fn class(&self) -> &'static str {
        match self {
            AxisOrient::Bottom => "x axis",
            AxisOrient::Left => "y axis",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub orient: AxisOrient,
    pub ticks: Vec<AxisTick>,
    /// 轴线覆盖的像素区间（升序）
    pub extent: (f64, f64),
    /// 相对绘图区的偏移
    pub offset: (f64, f64),
    pub label: Option<String>,
}

impl Axis {
    /// 底部时间轴
    pub fn bottom(scale: &TimeScale, interval_minutes: u32, format: &str, inner_height: f64) -> ChartResult<Self> {
        Ok(Self {
            orient: AxisOrient::Bottom,
            ticks: scale.axis_ticks(interval_minutes, format)?,
            extent: sorted(scale.range()),
            offset: (0.0, inner_height),
            label: None,
        })
    }

    /// 左侧价格轴
    pub fn left(scale: &LinearScale, tick_count: usize, label: Option<String>) -> Self {
        Self {
            orient: AxisOrient::Left,
            ticks: scale.axis_ticks(tick_count),
            extent: sorted(scale.range()),
            offset: (0.0, 0.0),
            label,
        }
    }

    /// 没有刻度的轴，用于退化图表
    pub fn empty(orient: AxisOrient, extent: (f64, f64), offset: (f64, f64)) -> Self {
        Self {
            orient,
            ticks: Vec::new(),
            extent,
            offset,
            label: None,
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.ticks.iter().map(|tick| tick.label.as_str()).collect()
    }

    pub fn to_svg(&self) -> SvgNode {
        let mut group = SvgNode::new("g").attr("class", self.orient.class());
        if self.offset != (0.0, 0.0) {
            group = group.attr("transform", translate(self.offset.0, self.offset.1));
        }

        let ticks = self.ticks.iter().map(|tick| self.tick_node(tick));
        group = group.children(ticks).child(self.domain_node());

        if let Some(label) = &self.label {
            group = group.child(
                SvgNode::new("text")
                    .attr("transform", "rotate(-90)")
                    .attr("y", "6")
                    .attr("dy", ".71em")
                    .attr("style", "text-anchor: end;")
                    .text(label.clone()),
            );
        }
        group
    }

    fn tick_node(&self, tick: &AxisTick) -> SvgNode {
        let offset = TICK_SIZE + TICK_PADDING;
        let (transform, line, text) = match self.orient {
            AxisOrient::Bottom => (
                translate(tick.position, 0.0),
                SvgNode::new("line").attr("y2", fmt_coord(TICK_SIZE)).attr("x2", "0"),
                SvgNode::new("text")
                    .attr("dy", ".71em")
                    .attr("y", fmt_coord(offset))
                    .attr("x", "0")
                    .attr("style", "text-anchor: middle;"),
            ),
            AxisOrient::Left => (
                translate(0.0, tick.position),
                SvgNode::new("line").attr("x2", fmt_coord(-TICK_SIZE)).attr("y2", "0"),
                SvgNode::new("text")
                    .attr("dy", ".32em")
                    .attr("x", fmt_coord(-offset))
                    .attr("y", "0")
                    .attr("style", "text-anchor: end;"),
            ),
        };

        SvgNode::new("g")
            .attr("class", "tick")
            .attr("transform", transform)
            .child(line)
            .child(text.text(tick.label.clone()))
    }

    fn domain_node(&self) -> SvgNode {
        let (start, end) = (fmt_coord(self.extent.0), fmt_coord(self.extent.1));
        let size = fmt_coord(TICK_SIZE);
        let d = match self.orient {
            AxisOrient::Bottom => format!("M{},{}V0H{}V{}", start, size, end, size),
            AxisOrient::Left => format!("M-{},{}H0V{}H-{}", size, start, end, size),
        };
        SvgNode::new("path").attr("class", "domain").attr("d", d)
    }
}

fn sorted(range: (f64, f64)) -> (f64, f64) {
    if range.0 <= range.1 {
        range
    } else {
        (range.1, range.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::parse_timestamp;

    #[test]
    fn test_left_axis_svg() {
        let y = LinearScale::new((99.7, 103.3), (90.0, 0.0));
        let axis = Axis::left(&y, 4, None);
        assert_eq!(axis.extent, (0.0, 90.0));

        let node = axis.to_svg();
        assert_eq!(node.get_attr("class"), Some("y axis"));
        assert_eq!(node.find_by_class("tick").len(), 4);
        let domain = node.find_by_class("domain");
        assert_eq!(domain[0].get_attr("d"), Some("M-6,0H0V90H-6"));
    }

    #[test]
    fn test_bottom_axis_svg() {
        let x = TimeScale::new(
            parse_timestamp("2024-01-01 00:00").unwrap(),
            parse_timestamp("2024-01-01 00:05").unwrap(),
            (0.0, 730.0),
        );
        let axis = Axis::bottom(&x, 5, "%H:%M", 90.0).unwrap();
        assert_eq!(axis.labels(), vec!["00:00", "00:05"]);

        let node = axis.to_svg();
        assert_eq!(node.get_attr("transform"), Some("translate(0,90)"));
        let ticks = node.find_by_class("tick");
        assert_eq!(ticks[1].get_attr("transform"), Some("translate(730,0)"));
        assert_eq!(node.find_by_class("domain")[0].get_attr("d"), Some("M0,6V0H730V6"));
    }
}
