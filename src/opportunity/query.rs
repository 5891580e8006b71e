//! 套利机会查询参数（`min_profit` / `limit`）
//!
//! 搜索表单提交后写回URL查询串，再从URL解析出来发起请求。

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::form_urlencoded;
use url::Url;

#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("Invalid value '{value}' for query parameter '{field}'")]
    InvalidNumber { field: &'static str, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpportunityQuery {
    /// 最小利润百分比
    pub min_profit: Option<f64>,
    /// 最多返回的条数
    pub limit: Option<usize>,
}

impl OpportunityQuery {
    pub fn new(min_profit: Option<f64>, limit: Option<usize>) -> Self {
        Self { min_profit, limit }
    }

    /// 解析查询串，例如 `min_profit=0.5&limit=20`；空值视为未设置，未知参数忽略
    pub fn parse(query: &str) -> Result<Self, QueryError> {
        Self::from_pairs(form_urlencoded::parse(query.trim_start_matches('?').as_bytes()))
    }

    pub fn from_url(url: &Url) -> Result<Self, QueryError> {
        Self::from_pairs(url.query_pairs())
    }

    /// 接受完整URL、`/path?query` 或裸查询串（搜索表单提交后的地址）
    pub fn from_location(location: &str) -> Result<Self, QueryError> {
        match Url::parse(location) {
            Ok(url) => Self::from_url(&url),
            Err(_) => match location.split_once('?') {
                Some((_, query)) => Self::parse(query),
                None => Self::parse(location),
            },
        }
    }

    /// 用命令行显式给出的值覆盖
    pub fn merge(self, min_profit: Option<f64>, limit: Option<usize>) -> Self {
        Self {
            min_profit: min_profit.or(self.min_profit),
            limit: limit.or(self.limit),
        }
    }

    fn from_pairs<'a, I>(pairs: I) -> Result<Self, QueryError>
    where
        I: Iterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "min_profit" => {
                    query.min_profit = Some(value.parse().map_err(|_| QueryError::InvalidNumber {
                        field: "min_profit",
                        value: value.to_string(),
                    })?);
                }
                "limit" => {
                    query.limit = Some(value.parse().map_err(|_| QueryError::InvalidNumber {
                        field: "limit",
                        value: value.to_string(),
                    })?);
                }
                _ => {}
            }
        }
        Ok(query)
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(min_profit) = self.min_profit {
            serializer.append_pair("min_profit", &min_profit.to_string());
        }
        if let Some(limit) = self.limit {
            serializer.append_pair("limit", &limit.to_string());
        }
        serializer.finish()
    }

    /// 用当前参数替换URL的查询串
    pub fn apply_to(&self, url: &mut Url) {
        let query = self.to_query_string();
        url.set_query(if query.is_empty() { None } else { Some(&query) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_string() {
        let query = OpportunityQuery::parse("?min_profit=0.5&limit=20&page=3").unwrap();
        assert_eq!(query, OpportunityQuery::new(Some(0.5), Some(20)));

        let blank = OpportunityQuery::parse("min_profit=&limit=").unwrap();
        assert_eq!(blank, OpportunityQuery::default());
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let err = OpportunityQuery::parse("limit=ten").unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidNumber { field: "limit", value: "ten".to_string() }
        );
    }

    #[test]
    fn test_from_location() {
        let expected = OpportunityQuery::new(Some(1.5), Some(10));
        for location in [
            "http://localhost:8080/?min_profit=1.5&limit=10",
            "/opportunities?min_profit=1.5&limit=10",
            "min_profit=1.5&limit=10",
        ] {
            assert_eq!(OpportunityQuery::from_location(location).unwrap(), expected);
        }
        assert_eq!(OpportunityQuery::from_location("/").unwrap(), OpportunityQuery::default());
    }

    #[test]
    fn test_merge_prefers_explicit_values() {
        let query = OpportunityQuery::new(Some(1.5), Some(10)).merge(None, Some(3));
        assert_eq!(query, OpportunityQuery::new(Some(1.5), Some(3)));
    }

    #[test]
    fn test_apply_to_url() {
        let query = OpportunityQuery::new(Some(1.5), Some(10));
        let mut url = Url::parse("http://localhost:8080/opportunities?stale=1").unwrap();
        query.apply_to(&mut url);
        assert_eq!(url.as_str(), "http://localhost:8080/opportunities?min_profit=1.5&limit=10");
        assert_eq!(OpportunityQuery::from_url(&url).unwrap(), query);
    }
}
