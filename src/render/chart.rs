//! The monthly balance bar chart shown for a vehicle.
//!
//! The chart is built as an ECharts configuration and written into a standalone HTML page that
//! loads ECharts from a CDN.

use crate::ledger::Ledger;
use charming::{
    component::{Axis, Grid, Title, VisualMap, VisualMapPiece},
    element::{AxisPointer, AxisPointerType, AxisType, Tooltip, Trigger},
    series::bar,
    Chart,
};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use rust_decimal::prelude::ToPrimitive;

const ECHARTS_SRC: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";
const POSITIVE: &str = "#28a745";
const NEGATIVE: &str = "#dc3545";

/// Bars per month, green when the month closed positive and red otherwise.
pub(crate) fn monthly_balance_chart(ledger: &Ledger) -> Chart {
    let labels: Vec<String> = ledger.monthly.iter().map(|m| m.month.clone()).collect();
    let values: Vec<f64> = ledger
        .monthly
        .iter()
        .map(|m| m.balance.value().to_f64().unwrap_or_default())
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Balanço Financeiro Mensal do Veículo")
                .subtext(ledger.plate.as_str()),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).name("Mês").data(labels))
        .y_axis(Axis::new().type_(AxisType::Value).name("Balanço (R$)"))
        .visual_map(VisualMap::new().show(false).pieces(vec![
            VisualMapPiece::new().lt(0).color(NEGATIVE),
            VisualMapPiece::new().gte(0).color(POSITIVE),
        ]))
        .series(bar::Bar::new().name("Balanço").data(values))
}

/// Wraps the chart configuration in an HTML page that renders it on load.
pub(crate) fn chart_page(title: &str, chart: &Chart) -> Markup {
    // A `</` inside a label would end the inline script.
    let options = chart.to_string().replace("</", "<\\/");
    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
    const chart = echarts.init(document.getElementById("chart"));
    chart.setOption({options});
    window.addEventListener('resize', chart.resize);
}});"#
    );

    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="UTF-8";
                title { (title) }
                script src=(ECHARTS_SRC) {}
            }
            body {
                div id="chart" style="width: 900px; height: 500px;" {}
                script { (PreEscaped(script)) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Kind, Transaction};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn ledger() -> Ledger {
        let txn = |date: &str, kind, amount: &str| Transaction {
            plate: "ABC1D23".to_string(),
            date: NaiveDate::from_str(date).unwrap(),
            kind,
            amount: Amount::from_str(amount).unwrap(),
            category: String::new(),
            description: String::new(),
        };
        Ledger::new(
            "ABC1D23",
            &[
                txn("2025-01-05", Kind::Income, "2.400,00"),
                txn("2025-02-05", Kind::Expense, "500,00"),
            ],
        )
    }

    #[test]
    fn test_chart_options_carry_months_and_values() {
        let options = monthly_balance_chart(&ledger()).to_string();
        assert!(options.contains("2025-01"));
        assert!(options.contains("2025-02"));
        assert!(options.contains("2400"));
        assert!(options.contains("-500"));
    }

    #[test]
    fn test_chart_page() {
        let chart = monthly_balance_chart(&ledger());
        let page = chart_page("Balanço ABC1D23", &chart).into_string();
        assert!(page.contains("<title>Balanço ABC1D23</title>"));
        assert!(page.contains(&format!(r#"<script src="{ECHARTS_SRC}"></script>"#)));
        assert!(page.contains("chart.setOption({"));
    }

    #[test]
    fn test_chart_page_escapes_plate() {
        let mut ledger = ledger();
        ledger.plate = "</script><b>".to_string();
        let chart = monthly_balance_chart(&ledger);

        let page = chart_page(&format!("Balanço {}", ledger.plate), &chart).into_string();

        assert!(page.contains("<title>Balanço &lt;/script&gt;&lt;b&gt;</title>"));
        assert!(page.contains(r"<\/script><b>"));
        assert_eq!(page.matches("</script>").count(), 2);
    }
}
