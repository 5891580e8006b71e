//! 完整HTML页面：搜索表单 + 套利机会表格 + 各交易所图表

use crate::chart::svg::escape;
use crate::chart::ChartContainer;
use crate::opportunity::{render_search_form, render_table, Opportunity, OpportunityQuery};

const STYLE: &str = "body{font:12px sans-serif;}\
.axis path,.axis line{fill:none;stroke:#000;shape-rendering:crispEdges;}\
.line{fill:none;stroke-width:1.5px;}\
table{border-collapse:collapse;}td,th{padding:2px 8px;}";

pub fn render_page(
    title: &str,
    query: &OpportunityQuery,
    opportunities: &[Opportunity],
    charts: &ChartContainer,
) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title><style>{style}</style></head>\
         <body><h1>Search for opportunities</h1>{form}{table}{charts}</body></html>",
        title = escape(title),
        style = STYLE,
        form = render_search_form(query),
        table = render_table(opportunities),
        charts = charts.to_html(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_sections() {
        let page = render_page("Spread <Sight>", &OpportunityQuery::default(), &[], &ChartContainer::default());
        assert!(page.contains("<title>Spread &lt;Sight&gt;</title>"));
        assert!(page.contains("<p>No results.</p>"));
        assert!(page.contains("<div class=\"chart\"></div>"));
    }
}
