// 数据获取层
//
// 图表核心只消费快照数组，不关心数据从哪里来。这里提供三种数据源：
// - HttpDataSource：从后端HTTP接口获取快照与套利机会
// - FileDataSource：从本地JSON文件读取
// - MemoryDataSource：内存中的序列（演示模式），套利机会直接从序列中检测

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;
use url::Url;

use crate::config::ClientConfig;
use crate::core::ChartError;
use crate::opportunity::{detect_in_series, filter_opportunities, Opportunity, OpportunityQuery};
use crate::orderbook::Series;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Chart data error: {0}")]
    Chart(#[from] ChartError),
}

/// 快照与套利机会的数据源
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_series(&self) -> Result<Series, ClientError>;

    async fn fetch_opportunities(&self, query: &OpportunityQuery) -> Result<Vec<Opportunity>, ClientError>;
}

/// 后端HTTP接口
pub struct HttpDataSource {
    client: reqwest::Client,
    base_url: Url,
    series_path: String,
    opportunities_path: String,
}

impl HttpDataSource {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
            series_path: config.series_path.clone(),
            opportunities_path: config.opportunities_path.clone(),
        })
    }

    pub fn series_url(&self) -> Result<Url, ClientError> {
        Ok(self.base_url.join(&self.series_path)?)
    }

    pub fn opportunities_url(&self, query: &OpportunityQuery) -> Result<Url, ClientError> {
        let mut url = self.base_url.join(&self.opportunities_path)?;
        query.apply_to(&mut url);
        Ok(url)
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch_series(&self) -> Result<Series, ClientError> {
        let url = self.series_url()?;
        log::info!("获取订单簿快照: {}", url);

        let body = self.client.get(url).send().await?.error_for_status()?.text().await?;
        Ok(Series::from_json(&body)?)
    }

    async fn fetch_opportunities(&self, query: &OpportunityQuery) -> Result<Vec<Opportunity>, ClientError> {
        let url = self.opportunities_url(query)?;
        log::info!("获取套利机会: {}", url);

        let opportunities = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Opportunity>>()
            .await?;
        Ok(opportunities)
    }
}

/// 本地JSON文件；未提供机会文件时从快照中检测
///
/// 快照文件只读取解析一次，之后的请求共用同一份序列。
pub struct FileDataSource {
    series_path: PathBuf,
    opportunities_path: Option<PathBuf>,
    series: OnceCell<Series>,
}

impl FileDataSource {
    pub fn new(series_path: impl Into<PathBuf>, opportunities_path: Option<PathBuf>) -> Self {
        Self {
            series_path: series_path.into(),
            opportunities_path,
            series: OnceCell::new(),
        }
    }

    async fn load_series(&self) -> Result<&Series, ClientError> {
        self.series
            .get_or_try_init(|| async {
                log::info!("读取订单簿快照: {}", self.series_path.display());
                let content = tokio::fs::read_to_string(&self.series_path).await?;
                Ok::<_, ClientError>(Series::from_json(&content)?)
            })
            .await
    }
}

#[async_trait]
impl DataSource for FileDataSource {
    async fn fetch_series(&self) -> Result<Series, ClientError> {
        Ok(self.load_series().await?.clone())
    }

    async fn fetch_opportunities(&self, query: &OpportunityQuery) -> Result<Vec<Opportunity>, ClientError> {
        let opportunities = match &self.opportunities_path {
            Some(path) => {
                let content = tokio::fs::read_to_string(path).await?;
                serde_json::from_str::<Vec<Opportunity>>(&content)?
            }
            None => detect_in_series(self.load_series().await?),
        };
        Ok(filter_opportunities(opportunities, query))
    }
}

/// 内存数据源
pub struct MemoryDataSource {
    series: Series,
}

impl MemoryDataSource {
    pub fn new(series: Series) -> Self {
        Self { series }
    }
}

#[async_trait]
impl DataSource for MemoryDataSource {
    async fn fetch_series(&self) -> Result<Series, ClientError> {
        Ok(self.series.clone())
    }

    async fn fetch_opportunities(&self, query: &OpportunityQuery) -> Result<Vec<Opportunity>, ClientError> {
        Ok(filter_opportunities(detect_in_series(&self.series), query))
    }
}

/// 并发获取快照与套利机会
pub async fn fetch_all(
    source: &dyn DataSource,
    query: &OpportunityQuery,
) -> Result<(Series, Vec<Opportunity>), ClientError> {
    futures::try_join!(source.fetch_series(), source.fetch_opportunities(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_urls() {
        let source = HttpDataSource::new(&ClientConfig::default()).unwrap();
        assert_eq!(source.series_url().unwrap().as_str(), "http://localhost:8080/orderbooks");

        let url = source
            .opportunities_url(&OpportunityQuery::new(Some(0.5), Some(20)))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/opportunities?min_profit=0.5&limit=20");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(HttpDataSource::new(&config), Err(ClientError::Url(_))));
    }

    #[tokio::test]
    async fn test_file_source_detects_opportunities_without_file() {
        let path = std::env::temp_dir().join(format!("spread_sight_series_{}.json", std::process::id()));
        let data = json!([
            {"StartDate": "2024-01-01 00:00", "Orderbooks": {
                "Cex": {"Bids": [{"Price": 99.0, "Volume": 1.0}], "Asks": [{"Price": 100.0, "Volume": 1.0}]},
                "Kraken": {"Bids": [{"Price": 101.0, "Volume": 1.0}], "Asks": [{"Price": 102.0, "Volume": 1.0}]}
            }}
        ]);
        std::fs::write(&path, data.to_string()).unwrap();

        let source = FileDataSource::new(&path, None);
        let (series, opportunities) = fetch_all(&source, &OpportunityQuery::default()).await.unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(opportunities.len(), 1);
        assert_eq!(opportunities[0].buy_exchanger, "Cex");

        // 文件删除后仍使用已解析的序列
        std::fs::remove_file(&path).unwrap();
        assert_eq!(source.fetch_series().await.unwrap(), series);
        let again = source.fetch_opportunities(&OpportunityQuery::default()).await.unwrap();
        assert_eq!(again, opportunities);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = FileDataSource::new("/nonexistent/series.json", None);
        assert!(matches!(source.fetch_series().await, Err(ClientError::Io(_))));
    }
}
