//! The landing page with the upload and manual entry forms.
//!
//! The forms are submitted by a small inline script that calls the JSON
//! endpoints and renders the predictions below the forms without a reload.

use axum::response::{IntoResponse, Response};
use maud::{Markup, PreEscaped, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, ECHARTS_SCRIPT, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, base,
        loading_spinner,
    },
    navigation::NavBar,
};

const QUOTE: &str = "Digital world without security is like a pyramid without foundation \
    which can collapse like a house of cards";

const HERO_QUOTE: &str = "Protect every transaction, because trust deserves a strong foundation.";

const HERO_IMAGE: &str =
    "https://advocatetanwar.com/wp-content/uploads/2024/01/How-to-secure-yourself-from-UPI-frauds.webp";

/// Calls the upload and manual entry endpoints and renders their responses.
///
/// Every value from the server is inserted as text, never as HTML.
const HOME_SCRIPT: &str = r#"
document.addEventListener('DOMContentLoaded', function() {
    const results = document.getElementById('results');

    function setBusy(form, busy) {
        const button = form.querySelector('button[type="submit"]');
        button.disabled = busy;
        button.querySelector('.spinner').classList.toggle('hidden', !busy);
    }

    function showError(message) {
        results.replaceChildren();
        const p = document.createElement('p');
        p.id = 'error-message';
        p.className = 'text-red-600 dark:text-red-400 font-semibold';
        p.textContent = message;
        results.appendChild(p);
    }

    function labelName(flag) {
        return Number(flag) === 1 ? 'Fraud' : 'Legitimate';
    }

    function cell(row, text) {
        const td = document.createElement('td');
        td.className = 'px-6 py-4';
        td.textContent = text;
        row.appendChild(td);
    }

    function showUpload(body) {
        results.replaceChildren();

        const total = Object.values(body.chart).reduce((sum, count) => sum + count, 0);
        const summary = document.createElement('p');
        summary.id = 'upload-summary';
        summary.className = 'text-lg font-semibold mb-4';
        summary.textContent = `${body.fraud_count} of ${total} transactions flagged as fraud.`;
        results.appendChild(summary);

        const chartDom = document.createElement('div');
        chartDom.className = 'min-h-[320px] w-full rounded dark:bg-gray-100 mb-4';
        results.appendChild(chartDom);
        echarts.init(chartDom).setOption({
            tooltip: { trigger: 'item' },
            legend: { bottom: '1%' },
            series: [{
                name: 'Transactions',
                type: 'pie',
                radius: '60%',
                data: ['0', '1'].map((flag) => ({ name: labelName(flag), value: body.chart[flag] || 0 })),
            }],
        });

        const table = document.createElement('table');
        table.className = 'w-full text-sm text-left text-gray-500 dark:text-gray-400';
        const header = table.createTHead().insertRow();
        for (const title of ['Amount', 'Merchant', 'Method', 'Label']) {
            const th = document.createElement('th');
            th.className = 'px-6 py-3';
            th.textContent = title;
            header.appendChild(th);
        }
        const tbody = table.createTBody();
        for (const row of body.rows) {
            const tr = tbody.insertRow();
            cell(tr, Number(row.amount).toFixed(2));
            cell(tr, row.merchant);
            cell(tr, row.method);
            cell(tr, labelName(row.is_fraud));
        }
        results.appendChild(table);
    }

    function showManual(body) {
        results.replaceChildren();
        const p = document.createElement('p');
        p.id = 'manual-result';
        p.className = 'text-lg font-semibold';
        p.textContent = `This transaction looks ${labelName(body.is_fraud) === 'Fraud' ? 'fraudulent' : 'legitimate'}.`;
        results.appendChild(p);
    }

    async function submit(form, request, onSuccess) {
        setBusy(form, true);
        try {
            const response = await fetch(form.action, request);
            const body = await response.json();
            if (response.ok) {
                onSuccess(body);
            } else {
                showError(body.error || 'Something went wrong.');
            }
        } catch (error) {
            showError('Could not reach the server.');
        } finally {
            setBusy(form, false);
        }
    }

    const uploadForm = document.getElementById('upload-form');
    uploadForm.addEventListener('submit', function(event) {
        event.preventDefault();
        submit(uploadForm, { method: 'POST', body: new FormData(uploadForm) }, showUpload);
    });

    const manualForm = document.getElementById('manual-form');
    manualForm.addEventListener('submit', function(event) {
        event.preventDefault();
        const data = new FormData(manualForm);
        const entry = {
            amount: data.get('amount'),
            merchant: data.get('merchant'),
            method: data.get('method'),
        };
        submit(manualForm, {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify(entry),
        }, showManual);
    });
});
"#;

/// Display the landing page.
pub async fn get_home_page() -> Response {
    home_view().into_response()
}

fn submit_button(text: &str) -> Markup {
    html!(
        button type="submit" class=(BUTTON_PRIMARY_STYLE)
        {
            span class="spinner hidden" { (loading_spinner()) }
            (text)
        }
    )
}

fn upload_form() -> Markup {
    html!(
        form
            id="upload-form"
            action=(endpoints::UPLOAD_API)
            method="post"
            enctype="multipart/form-data"
            class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold" { "Check a CSV file" }

            p class="text-sm text-gray-600 dark:text-gray-400"
            {
                "The file needs "
                code { "amount" } ", " code { "merchant" } " and " code { "method" }
                " columns. Not sure what that looks like? Download the "
                a href=(endpoints::DOWNLOAD_SAMPLE) class=(LINK_STYLE) { "sample file" }
                "."
            }

            div
            {
                label for="file" class=(FORM_LABEL_STYLE) { "Transactions file" }
                input
                    id="file"
                    name="file"
                    type="file"
                    accept=".csv,text/csv"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (submit_button("Check file"))
        }
    )
}

fn manual_form() -> Markup {
    html!(
        form
            id="manual-form"
            action=(endpoints::PREDICT_MANUAL_API)
            method="post"
            class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold" { "Check a single transaction" }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                input
                    id="amount"
                    name="amount"
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="merchant" class=(FORM_LABEL_STYLE) { "Merchant" }
                input
                    id="merchant"
                    name="merchant"
                    type="text"
                    placeholder="Corner Shop"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="method" class=(FORM_LABEL_STYLE) { "Payment method" }
                select id="method" name="method" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="upi" { "UPI" }
                    option value="credit" { "Credit card" }
                }
            }

            (submit_button("Check transaction"))
        }
    )
}

fn home_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::ROOT).into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            section id="hero" class="w-full max-w-4xl text-center mb-8"
            {
                img
                    src=(HERO_IMAGE)
                    alt="A phone showing a UPI payment"
                    class="mx-auto mb-6 max-h-72 rounded-lg shadow";

                h1 class="text-3xl font-extrabold mb-4" { (HERO_QUOTE) }

                blockquote class="text-lg italic text-gray-600 dark:text-gray-400"
                {
                    "\u{201C}" (QUOTE) "\u{201D}"
                }
            }

            section class="grid grid-cols-1 lg:grid-cols-2 gap-6 w-full max-w-4xl mb-8"
            {
                (upload_form())
                (manual_form())
            }

            section id="results" class="w-full max-w-4xl" aria-live="polite" {}
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        HeadElement::ScriptSource(PreEscaped(HOME_SCRIPT.to_owned())),
    ];

    base("Home", &scripts, &content)
}
