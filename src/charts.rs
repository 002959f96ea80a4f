//! Chart generation and rendering for the report pages.
//!
//! Charts are built as ECharts options with `charming` and initialised in the
//! browser by a small script:
//! - **Label pie**: legitimate vs fraudulent records for one payment method
//! - **Method bar**: legitimate and fraudulent records stacked per method

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisType, Emphasis, EmphasisFocus, Tooltip, Trigger},
    series::{Bar, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    classifier::FraudLabel,
    html::HeadElement,
    summary::{LabelDistribution, Summary},
};

/// A chart with its HTML container ID and ECharts configuration.
pub(crate) struct PageChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl PageChart {
    pub(crate) fn new(id: &'static str, chart: Chart) -> Self {
        Self {
            id,
            options: chart.to_string(),
        }
    }
}

/// Renders the HTML container for a chart.
pub(crate) fn chart_container(chart: &PageChart) -> Markup {
    html!(
        div
            id=(chart.id)
            class="min-h-[380px] w-full rounded dark:bg-gray-100"
        {}
    )
}

/// Generates JavaScript initialization code for `charts`.
///
/// Each chart follows the browser's dark mode setting and resizes with the window.
pub(crate) fn charts_script(charts: &[PageChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
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

/// The count for `label` in `distribution`, zero if it never occurs.
fn label_count(distribution: &LabelDistribution, label: FraudLabel) -> f64 {
    distribution
        .get(&label.to_string())
        .map(|&count| count as f64)
        .unwrap_or(0.0)
}

/// A pie chart of legitimate vs fraudulent records.
pub(crate) fn label_pie_chart(title: &str, distribution: &LabelDistribution) -> Chart {
    let data = [FraudLabel::Legitimate, FraudLabel::Fraud]
        .into_iter()
        .map(|label| (label_count(distribution, label), label.name()))
        .collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text(title).left("center"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom("1%"))
        .series(Pie::new().name("Transactions").radius("60%").data(data))
}

/// A stacked bar chart of legitimate and fraudulent records per payment method.
pub(crate) fn method_bar_chart(summary: &Summary) -> Chart {
    let methods: Vec<String> = summary.method_counts.keys().cloned().collect();
    let fraud: Vec<f64> = methods
        .iter()
        .map(|method| summary.by_method.get(method).copied().unwrap_or(0) as f64)
        .collect();
    let legitimate: Vec<f64> = methods
        .iter()
        .zip(&fraud)
        .map(|(method, fraud)| summary.method_counts[method] as f64 - fraud)
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Transactions by Method")
                .subtext("Legitimate and fraudulent"),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(Legend::new().top("1%").right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(80)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(methods))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(
            Bar::new()
                .name(FraudLabel::Legitimate.name())
                .stack("Transactions")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(legitimate),
        )
        .series(
            Bar::new()
                .name(FraudLabel::Fraud.name())
                .stack("Transactions")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(fraud),
        )
}
