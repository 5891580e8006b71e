// 图表核心错误处理
//
// 区分两类错误：
// - 不可恢复：输入数据无法解析（时间戳格式错误、JSON结构错误）或图表配置有误
// - 可恢复：单个交易所的价格区间退化，只影响该交易所的图表

use thiserror::Error;

use crate::orderbook::Exchange;

/// 图表渲染统一错误类型
#[derive(Error, Debug)]
pub enum ChartError {
    /// 时间戳无法按 `YYYY-MM-DD HH:MM` 解析
    #[error("Unparsable date '{value}': {source}")]
    UnparsableDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// 快照数组JSON结构错误
    #[error("Malformed snapshot data: {0}")]
    MalformedData(#[from] serde_json::Error),

    /// 序列为空，无法计算时间轴范围
    #[error("Empty series: no time domain")]
    EmptySeries,

    /// 交易所在整个序列中没有任何有效报价
    #[error("Degenerate price domain for {exchange}")]
    DegenerateDomain { exchange: Exchange },

    /// 时间轴标签格式无法输出
    #[error("Invalid tick label format '{format}'")]
    InvalidTickFormat { format: String },
}

impl ChartError {
    /// 是否可以通过渲染空图表来恢复
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ChartError::DegenerateDomain { .. } | ChartError::EmptySeries
        )
    }
}

pub type ChartResult<T> = Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        let degenerate = ChartError::DegenerateDomain { exchange: Exchange::Kraken };
        assert!(degenerate.is_recoverable());
        assert!(ChartError::EmptySeries.is_recoverable());

        let parse_err = chrono::NaiveDateTime::parse_from_str("bad", "%Y-%m-%d %H:%M").unwrap_err();
        let unparsable = ChartError::UnparsableDate { value: "bad".to_string(), source: parse_err };
        assert!(!unparsable.is_recoverable());
        assert!(unparsable.to_string().contains("'bad'"));

        let format = ChartError::InvalidTickFormat { format: "%Q".to_string() };
        assert!(!format.is_recoverable());
    }

    #[test]
    fn test_degenerate_message_names_exchange() {
        let err = ChartError::DegenerateDomain { exchange: Exchange::Btce };
        assert_eq!(err.to_string(), "Degenerate price domain for Btce");
    }
}
