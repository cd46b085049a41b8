//! Shared pieces for rendering ECharts visualizations built with `charming`.
//!
//! A chart is rendered as an empty container `div` plus a script that
//! initializes ECharts on that container with the chart's JSON options.

use charming::{
    Chart,
    element::{AxisPointer, AxisPointerType, JsFunction, Tooltip, Trigger},
};
use maud::{Markup, PreEscaped, html};

use crate::html::HeadElement;

/// The ECharts build loaded on pages with charts.
const ECHARTS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js";

/// A chart with its HTML container ID and ECharts configuration.
pub struct ChartView {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl ChartView {
    pub fn new(id: &'static str, chart: &Chart) -> Self {
        Self {
            id,
            options: chart.to_string(),
        }
    }
}

/// Renders the container for a single chart.
pub fn chart_container(chart: &ChartView) -> Markup {
    html!(
        div
            id=(chart.id)
            class="min-h-[380px] w-full rounded dark:bg-gray-100"
        {}
    )
}

/// The head elements needed to draw `charts`: the ECharts library and the
/// initialization code for each chart.
pub fn chart_head_elements(charts: &[ChartView]) -> Vec<HeadElement> {
    if charts.is_empty() {
        return Vec::new();
    }

    vec![
        HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
        charts_script(charts),
    ]
}

/// Generates JavaScript initialization code for `charts`.
///
/// Each chart follows the browser's dark mode setting and resizes with the window.
fn charts_script(charts: &[ChartView]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom) {{ return; }}
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

#[inline]
pub fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip for charts with a category axis.
pub fn currency_axis_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

/// Creates a tooltip for charts where each item is hovered on its own, e.g. pie charts.
pub fn currency_item_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Item)
        .value_formatter(currency_formatter())
}

#[cfg(test)]
mod charts_tests {
    use charming::{Chart, component::Title};

    use crate::html::HeadElement;

    use super::{ChartView, chart_head_elements};

    #[test]
    fn no_scripts_without_charts() {
        assert!(chart_head_elements(&[]).is_empty());
    }

    #[test]
    fn script_initializes_each_chart() {
        let charts = [
            ChartView::new("first-chart", &Chart::new().title(Title::new().text("First"))),
            ChartView::new("second-chart", &Chart::new().title(Title::new().text("Second"))),
        ];

        let elements = chart_head_elements(&charts);

        assert_eq!(elements.len(), 2);
        let HeadElement::ScriptSource(script) = &elements[1] else {
            panic!("expected the second head element to be an inline script");
        };
        assert!(script.0.contains(r#"document.getElementById("first-chart")"#));
        assert!(script.0.contains(r#"document.getElementById("second-chart")"#));
        assert!(script.0.contains("\"First\""));
    }
}
