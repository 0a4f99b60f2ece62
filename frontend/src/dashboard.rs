use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

use crate::api::{ApiClient, CategoryBreakdown, StatsSummary, Transaction, TransactionPage};
use crate::chartjs::{self, ChartHandle};
use crate::charts::ChartSource;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::format::{format_category, format_count, format_currency, format_date, title_case};
use crate::icons::{icon_chevron_left, icon_chevron_right, icon_download, icon_trash};
use crate::pagination::PageWindow;
use crate::theme::use_theme_generation;

/// A full reload always starts the table from here.
const FIRST_PAGE: u32 = 1;

const CLEAR_CONFIRMATION: &str =
    "Are you sure you want to clear all transaction data? This action cannot be undone.";

#[derive(Clone, PartialEq)]
struct DashboardCharts {
    category: ChartSource,
    monthly: ChartSource,
    volume: ChartSource,
    breakdown: Rc<Vec<CategoryBreakdown>>,
}

async fn load_dashboard_data(
    client: &ApiClient,
    stats: &UseStateHandle<Option<StatsSummary>>,
    charts: &UseStateHandle<Option<DashboardCharts>>,
) -> Result<(), ApiError> {
    let summary = client.stats().await?;
    let breakdown = Rc::new(summary.categories.clone());
    stats.set(Some(summary));

    let distribution = client.category_distribution().await?;
    let monthly = client.monthly_stats().await?;

    charts.set(Some(DashboardCharts {
        category: ChartSource::Category(Rc::new(distribution)),
        monthly: ChartSource::Monthly(Rc::new(monthly)),
        volume: ChartSource::Volume(breakdown.clone()),
        breakdown,
    }));
    Ok(())
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn clear_data(client: ApiClient) {
    let confirmed = web_sys::window()
        .and_then(|window| window.confirm_with_message(CLEAR_CONFIRMATION).ok())
        .unwrap_or(false);
    if !confirmed {
        return;
    }

    spawn_local(async move {
        match client.clear_data().await {
            Ok(()) => {
                log::info!("transaction data cleared");
                alert("Data cleared successfully");
                if let Some(window) = web_sys::window() {
                    let _ = window.location().reload();
                }
            }
            Err(err) => alert(&format!("Error clearing data: {}", err.detail())),
        }
    });
}

#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let config = use_context::<AppConfig>().unwrap_or_default();
    let client = ApiClient::new(&config);
    let generation = use_theme_generation(config.theme_settle_ms);

    let stats = use_state(|| None::<StatsSummary>);
    let charts = use_state(|| None::<DashboardCharts>);
    let page = use_state(|| None::<TransactionPage>);

    let load_transactions = {
        let client = client.clone();
        let page = page.clone();
        let per_page = config.per_page;
        Callback::from(move |number: u32| {
            let client = client.clone();
            let page = page.clone();
            spawn_local(async move {
                match client.transactions(number, per_page).await {
                    Ok(next) => page.set(Some(next)),
                    Err(err) => log::error!("Error loading transactions: {}", err),
                }
            });
        })
    };

    {
        let client = client.clone();
        let stats = stats.clone();
        let charts = charts.clone();
        let load_transactions = load_transactions.clone();
        use_effect_with_deps(
            move |generation| {
                log::debug!("loading dashboard data (generation {})", generation);
                spawn_local(async move {
                    match load_dashboard_data(&client, &stats, &charts).await {
                        Ok(()) => load_transactions.emit(FIRST_PAGE),
                        Err(err) => log::error!("Error loading dashboard data: {}", err),
                    }
                });
                || ()
            },
            generation,
        );
    }

    let on_export = {
        let url = client.export_url();
        Callback::from(move |_: MouseEvent| {
            if let Some(window) = web_sys::window() {
                if let Err(err) = window.open_with_url_and_target(&url, "_blank") {
                    log::error!("Error exporting data: {:?}", err);
                }
            }
        })
    };

    let on_clear = {
        let client = client.clone();
        Callback::from(move |_: MouseEvent| clear_data(client.clone()))
    };

    let category_source = (*charts).as_ref().map(|c| c.category.clone());
    let monthly_source = (*charts).as_ref().map(|c| c.monthly.clone());
    let volume_source = (*charts).as_ref().map(|c| c.volume.clone());
    let breakdown = (*charts).as_ref().map(|c| c.breakdown.clone());

    html! {
        <div class="dashboard">
            <div class="dashboard-actions">
                <button id="export-btn" class="secondary-btn" onclick={on_export}>
                    { icon_download() }
                    <span>{"Export CSV"}</span>
                </button>
                <button id="clear-data-btn" class="danger-btn" onclick={on_clear}>
                    { icon_trash() }
                    <span>{"Clear Data"}</span>
                </button>
            </div>

            <SummaryCards stats={(*stats).clone()} currency={config.currency.clone()} />

            <div class="charts-grid">
                <div class="chart-card">
                    <h3>{"Transaction Categories"}</h3>
                    <div class="chart-container">
                        <ChartCanvas id="categoryChart" source={category_source} generation={generation} currency={config.currency.clone()} />
                    </div>
                </div>
                <div class="chart-card">
                    <h3>{"Monthly Trend"}</h3>
                    <div class="chart-container">
                        <ChartCanvas id="monthlyChart" source={monthly_source} generation={generation} currency={config.currency.clone()} />
                    </div>
                </div>
                <div class="chart-card">
                    <h3>{"Volume by Category"}</h3>
                    <div class="chart-container">
                        <ChartCanvas id="volumeChart" source={volume_source} generation={generation} currency={config.currency.clone()} />
                    </div>
                </div>
                <div class="chart-card">
                    <h3>{"Category Breakdown"}</h3>
                    <CategoryBreakdownList categories={breakdown} currency={config.currency.clone()} />
                </div>
            </div>

            <TransactionTable
                page={(*page).clone()}
                currency={config.currency.clone()}
                on_page={load_transactions}
            />
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct SummaryCardsProps {
    stats: Option<StatsSummary>,
    currency: String,
}

#[function_component(SummaryCards)]
fn summary_cards(props: &SummaryCardsProps) -> Html {
    let stats = props.stats.clone().unwrap_or_default();
    let cards = [
        ("total-transactions", "Total Transactions", format_count(stats.total_transactions)),
        ("total-amount", "Total Amount", format_currency(stats.total_amount, &props.currency)),
        ("total-fees", "Total Fees", format_currency(stats.total_fees, &props.currency)),
        (
            "avg-transaction",
            "Average Transaction",
            format_currency(stats.average_amount(), &props.currency),
        ),
    ];

    html! {
        <div class="stats-grid">
            { for cards.into_iter().map(|(id, title, value)| html! {
                <div class="stat-card">
                    <p class="stat-title">{ title }</p>
                    <h3 id={id} class="stat-value">{ value }</h3>
                </div>
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ChartCanvasProps {
    id: &'static str,
    source: Option<ChartSource>,
    generation: u32,
    currency: String,
}

/// Owns the chart drawn on one canvas. Any previous chart is destroyed
/// before a new one is created; unmounting drops the last one.
#[function_component(ChartCanvas)]
fn chart_canvas(props: &ChartCanvasProps) -> Html {
    let canvas_ref = use_node_ref();
    let handle = use_mut_ref(|| None::<ChartHandle>);

    {
        let canvas_ref = canvas_ref.clone();
        let handle = handle.clone();
        let currency = props.currency.clone();
        let id = props.id;
        use_effect_with_deps(
            move |(source, _generation)| {
                handle.borrow_mut().take();
                if let (Some(source), Some(canvas)) =
                    (source, canvas_ref.cast::<HtmlCanvasElement>())
                {
                    match chartjs::render(&canvas, source, &currency) {
                        Ok(chart) => *handle.borrow_mut() = chart,
                        Err(err) => log::error!("Error rendering {}: {}", id, err),
                    }
                }
                || ()
            },
            (props.source.clone(), props.generation),
        );
    }

    html! { <canvas id={props.id} ref={canvas_ref}></canvas> }
}

#[derive(Properties, PartialEq)]
struct CategoryBreakdownProps {
    categories: Option<Rc<Vec<CategoryBreakdown>>>,
    currency: String,
}

const NO_CATEGORIES: &str = "No data available";
const NO_TRANSACTIONS: &str = "No transactions found";

/// What a list fed by the backend shows: nothing until the first response,
/// a placeholder row for an empty response, otherwise the items.
#[derive(Debug, PartialEq)]
enum Listing<'a, T> {
    Pending,
    Empty,
    Items(&'a [T]),
}

fn listing<T>(items: Option<&[T]>) -> Listing<'_, T> {
    match items {
        None => Listing::Pending,
        Some([]) => Listing::Empty,
        Some(items) => Listing::Items(items),
    }
}

#[function_component(CategoryBreakdownList)]
fn category_breakdown_list(props: &CategoryBreakdownProps) -> Html {
    let body = match listing(props.categories.as_deref().map(Vec::as_slice)) {
        Listing::Pending => html! {},
        Listing::Empty => html! {
            <p class="empty-state">{ NO_CATEGORIES }</p>
        },
        Listing::Items(categories) => html! {
            { for categories.iter().map(|category| html! {
                <div class="category-item">
                    <span class="category-name">{ title_case(&category.key) }</span>
                    <div class="category-stats">
                        <span class="category-count">{ category.count.to_string() }</span>
                        <span class="category-amount">{ format_currency(category.amount, &props.currency) }</span>
                    </div>
                </div>
            }) }
        },
    };

    html! { <div id="category-breakdown">{ body }</div> }
}

/// Cell text for one table row: date, category, recipient, amount, fee,
/// balance. A missing recipient or balance shows as `-`.
fn row_cells(transaction: &Transaction, currency: &str) -> [String; 6] {
    let recipient = transaction
        .recipient_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or("-")
        .to_string();
    let balance = transaction
        .balance
        .map(|balance| format_currency(balance, currency))
        .unwrap_or_else(|| "-".to_string());

    [
        format_date(transaction.date.as_deref()),
        format_category(transaction.category.as_deref()),
        recipient,
        format_currency(transaction.amount, currency),
        format_currency(transaction.fee, currency),
        balance,
    ]
}

fn transaction_row(transaction: &Transaction, currency: &str) -> Html {
    html! {
        <tr>
            { for row_cells(transaction, currency).into_iter().map(|cell| html! { <td>{ cell }</td> }) }
        </tr>
    }
}

#[derive(Properties, PartialEq)]
struct TransactionTableProps {
    page: Option<TransactionPage>,
    currency: String,
    on_page: Callback<u32>,
}

#[function_component(TransactionTable)]
fn transaction_table(props: &TransactionTableProps) -> Html {
    let rows = match listing(props.page.as_ref().map(|page| page.transactions.as_slice())) {
        Listing::Pending => html! {},
        Listing::Empty => html! {
            <tr><td colspan="6" class="empty-state">{ NO_TRANSACTIONS }</td></tr>
        },
        Listing::Items(transactions) => html! {
            { for transactions.iter().map(|t| transaction_row(t, &props.currency)) }
        },
    };

    let window = props
        .page
        .as_ref()
        .filter(|page| !page.transactions.is_empty())
        .and_then(|page| PageWindow::new(page.current_page, page.pages));

    html! {
        <div class="transactions-card">
            <h3>{"Recent Transactions"}</h3>
            <div class="table-container">
                <table class="transactions-table">
                    <thead>
                        <tr>
                            <th>{"Date"}</th>
                            <th>{"Category"}</th>
                            <th>{"Recipient"}</th>
                            <th>{"Amount"}</th>
                            <th>{"Fee"}</th>
                            <th>{"Balance"}</th>
                        </tr>
                    </thead>
                    <tbody id="transactions-tbody">{ rows }</tbody>
                </table>
            </div>
            <Pagination window={window} on_page={props.on_page.clone()} />
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct PaginationProps {
    window: Option<PageWindow>,
    on_page: Callback<u32>,
}

#[function_component(Pagination)]
fn pagination(props: &PaginationProps) -> Html {
    let Some(window) = props.window.clone() else {
        return html! { <div id="pagination" class="pagination"></div> };
    };

    let go_to = |target: u32| {
        let on_page = props.on_page.clone();
        Callback::from(move |_: MouseEvent| on_page.emit(target))
    };

    html! {
        <div id="pagination" class="pagination">
            <button disabled={!window.has_previous()} onclick={go_to(window.previous())}>
                { icon_chevron_left() }
            </button>
            { for window.pages.clone().map(|number| html! {
                <button
                    class={classes!((number == window.current).then_some("active"))}
                    onclick={go_to(number)}
                >
                    { number.to_string() }
                </button>
            }) }
            <button disabled={!window.has_next()} onclick={go_to(window.next())}>
                { icon_chevron_right() }
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(recipient: Option<&str>, balance: Option<f64>) -> Transaction {
        Transaction {
            date: Some("2024-03-05T14:30:00".to_string()),
            category: Some("mobile_money_transfer".to_string()),
            recipient_name: recipient.map(str::to_string),
            amount: 12_500.0,
            fee: 100.0,
            balance,
        }
    }

    #[test]
    fn row_shows_every_column() {
        let cells = row_cells(&transaction(Some("Jane Smith"), Some(40_000.0)), "RWF");
        assert_eq!(
            cells,
            [
                "Mar 5, 2024, 02:30 PM".to_string(),
                "Mobile Money Transfer".to_string(),
                "Jane Smith".to_string(),
                "12,500 RWF".to_string(),
                "100 RWF".to_string(),
                "40,000 RWF".to_string(),
            ]
        );
    }

    #[test]
    fn missing_recipient_and_balance_show_a_dash() {
        let cells = row_cells(&transaction(None, None), "RWF");
        assert_eq!(cells[2], "-");
        assert_eq!(cells[5], "-");

        let cells = row_cells(&transaction(Some(""), Some(0.0)), "RWF");
        assert_eq!(cells[2], "-");
        assert_eq!(cells[5], "0 RWF");
    }

    #[test]
    fn empty_responses_get_a_placeholder() {
        let none: Option<&[Transaction]> = None;
        assert_eq!(listing(none), Listing::Pending);
        assert_eq!(listing::<Transaction>(Some(&[][..])), Listing::Empty);
        assert_eq!(listing::<CategoryBreakdown>(Some(&[][..])), Listing::Empty);

        let rows = vec![transaction(None, None)];
        assert_eq!(listing(Some(rows.as_slice())), Listing::Items(rows.as_slice()));
    }

    #[test]
    fn placeholder_text() {
        assert_eq!(NO_TRANSACTIONS, "No transactions found");
        assert_eq!(NO_CATEGORIES, "No data available");
    }
}
