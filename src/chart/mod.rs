//! 多交易所订单簿折线图模块
//!
//! - scale: 时间/价格比例尺与刻度
//! - series: 买卖价格线
//! - axis: 坐标轴
//! - fragment: 单个交易所的图表片段
//! - composer: 按交易所组装图表
//! - container: 数据更新时整体重建图表
//! - svg: SVG节点树

pub mod axis;
pub mod composer;
pub mod container;
pub mod fragment;
pub mod scale;
pub mod series;
pub mod svg;

// 重新导出主要类型
pub use axis::{Axis, AxisOrient};
pub use composer::ChartComposer;
pub use container::ChartContainer;
pub use fragment::ChartFragment;
pub use scale::{price_domain, AxisTick, LinearScale, ScaleSet, TimeScale};
pub use series::{render_line, GapPolicy, LinePath};
pub use svg::SvgNode;
