//! The history page: an overview of every transaction classified so far.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    charts::{PageChart, chart_container, charts_script, method_bar_chart},
    endpoints,
    history::{HistoryStore, LabeledRecord, Source, most_recent},
    html::{
        ECHARTS_SCRIPT, HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, TABLE_STYLE, base, format_amount, format_count, label_badge, link,
    },
    navigation::NavBar,
    summary::{Summary, summarize},
};

/// The maximum number of records listed on the history page.
pub const HISTORY_RECENT_LIMIT: usize = 100;

const CARD_STYLE: &str = "flex flex-col gap-1 p-6 bg-white rounded-lg shadow \
    dark:bg-gray-800 dark:border dark:border-gray-700";

/// Display the aggregate summary and the most recent records.
pub async fn get_history_page(State(history): State<HistoryStore>) -> Result<Response, Error> {
    // The cards and the recent list are built from the same read.
    let records = history
        .read_all()
        .inspect_err(|error| tracing::error!("Could not read history: {error}"))?;

    let nav_bar = NavBar::new(endpoints::HISTORY_VIEW);

    if records.is_empty() {
        return Ok(history_no_data_view(nav_bar).into_response());
    }

    let summary = summarize(&records);
    let recent = most_recent(&records, HISTORY_RECENT_LIMIT);

    Ok(history_view(nav_bar, &summary, recent).into_response())
}

fn history_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let home_link = link(endpoints::ROOT, "home page");

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "The history will show up here once you check some transactions.
                You can upload a CSV file or enter a transaction by hand on the "
                (home_link) "."
            }
        }
    );

    base("History", &[], &content)
}

fn history_view(nav_bar: NavBar, summary: &Summary, recent: &[LabeledRecord]) -> Markup {
    let nav_bar = nav_bar.into_html();
    let chart = PageChart::new("method-chart", method_bar_chart(summary));

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-6" { "History" }

            section id="summary" class="grid grid-cols-1 sm:grid-cols-2 gap-4 w-full mb-6"
            {
                (summary_card("Transactions checked", summary.total))
                (summary_card("Flagged as fraud", summary.fraud))
            }

            section class="grid grid-cols-1 xl:grid-cols-2 gap-4 w-full mb-6"
            {
                (chart_container(&chart))
                (method_table(summary))
            }

            section id="recent" class="w-full"
            {
                h2 class="text-xl font-semibold mb-4"
                {
                    "Most recent " (recent.len()) " transactions"
                }

                (records_table(recent))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(&[chart]),
    ];

    base("History", &scripts, &content)
}

fn summary_card(title: &str, count: u64) -> Markup {
    html!(
        div class=(CARD_STYLE)
        {
            span class="text-sm text-gray-500 dark:text-gray-400" { (title) }
            span class="text-3xl font-bold" { (format_count(count)) }
        }
    )
}

fn method_table(summary: &Summary) -> Markup {
    html!(
        div id="methods" class="overflow-x-auto rounded-lg shadow"
        {
            table class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Method" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Transactions" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Fraud" }
                    }
                }

                tbody
                {
                    @for (method, count) in &summary.method_counts {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { (method) }
                            td class=(TABLE_CELL_STYLE) { (format_count(*count)) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                (format_count(summary.by_method.get(method).copied().unwrap_or(0)))
                            }
                        }
                    }
                }
            }
        }
    )
}

/// The records newest first.
fn records_table(records: &[LabeledRecord]) -> Markup {
    html!(
        div class="overflow-x-auto rounded-lg shadow"
        {
            table class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Merchant" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Method" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Label" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Source" }
                    }
                }

                tbody
                {
                    @for record in records.iter().rev() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (format_amount(record.amount)) }
                            td class=(TABLE_CELL_STYLE) { (record.merchant) }
                            td class=(TABLE_CELL_STYLE) { (record.method) }
                            td class=(TABLE_CELL_STYLE) { (label_badge(record.is_fraud)) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                @match record.source {
                                    Source::Upload => { "Upload" }
                                    Source::Manual => { "Manual" }
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}
