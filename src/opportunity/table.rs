//! 套利机会表格与搜索表单（HTML）

use super::query::OpportunityQuery;
use super::Opportunity;
use crate::chart::svg::escape;

pub const NO_RESULTS: &str = "<p>No results.</p>";

/// 每行8列：日期、利润、买入交易所/卖一价/卖一量、卖出交易所/买一价/买一量
pub fn row_cells(opportunity: &Opportunity) -> [String; 8] {
    [
        opportunity.date.clone(),
        format!("{}%", opportunity.spread),
        opportunity.buy_exchanger.clone(),
        opportunity.ask.price.to_string(),
        opportunity.ask.volume.to_string(),
        opportunity.sell_exchanger.clone(),
        opportunity.bid.price.to_string(),
        opportunity.bid.volume.to_string(),
    ]
}

pub fn render_table(opportunities: &[Opportunity]) -> String {
    if opportunities.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut html = String::from(
        "<table><thead><tr><th>Date</th><th>Spread</th>\
         <th colspan=\"3\">Buy</th><th colspan=\"3\">Sell</th></tr></thead><tbody>",
    );
    for opportunity in opportunities {
        html.push_str("<tr>");
        for cell in row_cells(opportunity) {
            html.push_str("<td>");
            html.push_str(&escape(&cell));
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

/// 搜索表单，默认值来自当前查询参数
pub fn render_search_form(query: &OpportunityQuery) -> String {
    let min_profit = query.min_profit.map(|v| v.to_string()).unwrap_or_default();
    let limit = query.limit.map(|v| v.to_string()).unwrap_or_default();

    format!(
        "<form method=\"get\">\
         <label>Min profit</label><input name=\"min_profit\" type=\"text\" size=\"10\" value=\"{}\" />\
         <label>Limit</label><input name=\"limit\" type=\"text\" size=\"10\" value=\"{}\" />\
         <input type=\"submit\" value=\"send\" />\
         </form>",
        escape(&min_profit),
        escape(&limit)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::PriceLevel;

    fn opportunity() -> Opportunity {
        Opportunity {
            date: "2016-03-01 10:00".to_string(),
            spread: 1.25,
            buy_exchanger: "Kraken".to_string(),
            ask: PriceLevel::new(400.0, 1.5),
            sell_exchanger: "Hitbtc".to_string(),
            bid: PriceLevel::new(405.0, 0.7),
        }
    }

    #[test]
    fn test_empty_table_shows_message() {
        assert_eq!(render_table(&[]), "<p>No results.</p>");
    }

    #[test]
    fn test_row_has_eight_ordered_columns() {
        let cells = row_cells(&opportunity());
        assert_eq!(
            cells,
            ["2016-03-01 10:00", "1.25%", "Kraken", "400", "1.5", "Hitbtc", "405", "0.7"].map(String::from)
        );

        let html = render_table(&[opportunity(), opportunity()]);
        assert_eq!(html.matches("<tr>").count(), 3);
        assert_eq!(html.matches("<td>").count(), 16);
        assert!(html.contains("<td>1.25%</td><td>Kraken</td><td>400</td>"));
    }

    #[test]
    fn test_search_form_defaults() {
        let form = render_search_form(&OpportunityQuery::new(Some(0.5), None));
        assert!(form.contains("name=\"min_profit\" type=\"text\" size=\"10\" value=\"0.5\""));
        assert!(form.contains("name=\"limit\" type=\"text\" size=\"10\" value=\"\""));
    }
}
