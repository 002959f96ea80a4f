//! Informational pages for each payment method, with the label distribution
//! of that method's records.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    charts::{PageChart, chart_container, charts_script, label_pie_chart},
    classifier::PaymentMethod,
    endpoints,
    history::HistoryStore,
    html::{ECHARTS_SCRIPT, HeadElement, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    summary::LabelDistribution,
};

/// The fixed text shown on a payment method page.
struct MethodPage {
    method: PaymentMethod,
    endpoint: &'static str,
    title: &'static str,
    image: &'static str,
    paragraphs: &'static [&'static str],
}

const UPI_PAGE: MethodPage = MethodPage {
    method: PaymentMethod::Upi,
    endpoint: endpoints::UPI_VIEW,
    title: "UPI Fraud",
    image: "https://ccoe.dsci.in/storage/blogs/June2024/y1YjAyDCtzWvuRIldJI3.png",
    paragraphs: &[
        "UPI payments settle instantly, which makes them a favourite target for \
        scammers. Common tricks include fake payment requests, QR codes that \
        collect money instead of paying it, and callers posing as bank staff \
        who ask for your UPI PIN.",
        "Never share your PIN or one time passwords, check the name of the \
        payee before approving a request, and remember that you never need to \
        enter your PIN to receive money.",
    ],
};

const CREDIT_PAGE: MethodPage = MethodPage {
    method: PaymentMethod::Credit,
    endpoint: endpoints::CREDIT_VIEW,
    title: "Credit Card Fraud",
    image: "https://media.licdn.com/dms/image/v2/D5612AQEIF5Tmb__5Dw/article-cover_image-shrink_600_2000/\
        article-cover_image-shrink_600_2000/0/1722662110297?e=2147483647&v=beta\
        &t=IjFDhqbxuMC-qfCypRZLmO-U62RAEF9IJES3V1wF3Oc",
    paragraphs: &[
        "Credit card fraud ranges from stolen card numbers used for online \
        purchases to skimming devices on card readers and phishing pages that \
        imitate your bank.",
        "Unusually large purchases and payments to unfamiliar merchants are the \
        most common warning signs. Review your statements often and report any \
        charge you do not recognise to your bank straight away.",
    ],
};

/// Display the UPI fraud page.
pub async fn get_upi_page(State(history): State<HistoryStore>) -> Result<Response, Error> {
    get_method_page(&history, &UPI_PAGE)
}

/// Display the credit card fraud page.
pub async fn get_credit_page(State(history): State<HistoryStore>) -> Result<Response, Error> {
    get_method_page(&history, &CREDIT_PAGE)
}

fn get_method_page(history: &HistoryStore, page: &MethodPage) -> Result<Response, Error> {
    let summary = history
        .summary()
        .inspect_err(|error| tracing::error!("Could not summarize history: {error}"))?;

    Ok(method_view(page, summary.chart_for(page.method)).into_response())
}

fn method_view(page: &MethodPage, distribution: &LabelDistribution) -> Markup {
    let nav_bar = NavBar::new(page.endpoint).into_html();
    let has_records = !distribution.is_empty();
    let chart = PageChart::new(
        "label-chart",
        label_pie_chart(page.method.as_str(), distribution),
    );

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            article class="w-full max-w-3xl space-y-4 mb-8"
            {
                h1 class="text-2xl font-bold" { (page.title) }

                img src=(page.image) alt=(page.title) class="w-full max-h-80 object-cover rounded-lg shadow";

                @for paragraph in page.paragraphs {
                    p class="text-gray-700 dark:text-gray-300" { (paragraph) }
                }
            }

            section class="w-full max-w-3xl"
            {
                @if has_records {
                    (chart_container(&chart))
                } @else {
                    p id="no-data" class="text-center"
                    {
                        "No " (page.method.as_str()) " transactions have been checked yet. "
                        "Try the sample file on the " (link(endpoints::ROOT, "home page")) "."
                    }
                }
            }
        }
    );

    if has_records {
        let scripts = [
            HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
            charts_script(&[chart]),
        ];
        base(page.title, &scripts, &content)
    } else {
        base(page.title, &[], &content)
    }
}
