use axum::{
    Router,
    body::Bytes,
    extract::{Json, Query},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::core::{
    CompoundingFrequency, ProjectionSummary, SimulationConfig, YearlySnapshot, finite_or_zero,
    horizon_months, parse_number, simulate, summarize,
};
use crate::error::{InputError, RunError};
use crate::report::{format_money, render_summary, render_table, year_label};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

/// Longest horizon accepted from the CLI or the API.
pub const MAX_HORIZON_YEARS: f64 = 200.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliCompoundingFrequency {
    Monthly,
    Annually,
}

impl From<CliCompoundingFrequency> for CompoundingFrequency {
    fn from(value: CliCompoundingFrequency) -> Self {
        match value {
            CliCompoundingFrequency::Monthly => CompoundingFrequency::Monthly,
            CliCompoundingFrequency::Annually => CompoundingFrequency::Annually,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiCompoundingFrequency {
    #[serde(alias = "mensual")]
    Monthly,
    #[serde(alias = "annual", alias = "yearly", alias = "anual")]
    Annually,
}

impl From<ApiCompoundingFrequency> for CliCompoundingFrequency {
    fn from(value: ApiCompoundingFrequency) -> Self {
        match value {
            ApiCompoundingFrequency::Monthly => CliCompoundingFrequency::Monthly,
            ApiCompoundingFrequency::Annually => CliCompoundingFrequency::Annually,
        }
    }
}

/// Form fields arrive either as JSON numbers or as raw text typed by the user.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    fn value(&self) -> f64 {
        match self {
            NumericInput::Number(v) => finite_or_zero(*v),
            NumericInput::Text(text) => parse_number(text),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    initial: Option<NumericInput>,
    #[serde(alias = "monthly")]
    periodic_contribution: Option<NumericInput>,
    #[serde(alias = "years")]
    horizon_years: Option<NumericInput>,
    #[serde(alias = "annualReturnPct")]
    annual_return_rate: Option<NumericInput>,
    #[serde(alias = "annualInflationPct")]
    annual_inflation_rate: Option<NumericInput>,
    #[serde(alias = "frequency")]
    compounding_frequency: Option<ApiCompoundingFrequency>,
}

fn parse_amount(raw: &str) -> Result<f64, Infallible> {
    Ok(parse_number(raw))
}

#[derive(Parser, Debug)]
#[command(
    name = "savings",
    about = "Savings projection with nominal, inflation-adjusted and contributed totals",
    after_help = "Run `savings serve [port]` to start the HTTP API and web form instead."
)]
struct Cli {
    #[arg(long, default_value_t = 600.0, value_parser = parse_amount, help = "Initial deposit")]
    initial: f64,
    #[arg(
        long,
        visible_alias = "periodic-contribution",
        default_value_t = 600.0,
        value_parser = parse_amount,
        help = "Amount contributed every month"
    )]
    monthly: f64,
    #[arg(
        long,
        visible_alias = "horizon-years",
        default_value_t = 30.0,
        value_parser = parse_amount,
        help = "Horizon in years; fractions are rounded to whole months"
    )]
    years: f64,
    #[arg(
        long,
        default_value_t = 10.0,
        value_parser = parse_amount,
        allow_hyphen_values = true,
        help = "Expected annual return in percent, e.g. 10"
    )]
    annual_return_rate: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        value_parser = parse_amount,
        allow_hyphen_values = true,
        help = "Expected annual inflation in percent, e.g. 3"
    )]
    annual_inflation_rate: f64,
    #[arg(
        long,
        value_enum,
        default_value_t = CliCompoundingFrequency::Annually,
        help = "How often investment growth is applied"
    )]
    frequency: CliCompoundingFrequency,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    #[serde(flatten)]
    totals: ProjectionSummary,
    year_label: String,
    nominal_formatted: String,
    real_formatted: String,
    contributed_formatted: String,
}

impl From<ProjectionSummary> for SummaryResponse {
    fn from(totals: ProjectionSummary) -> Self {
        Self {
            totals,
            year_label: year_label(totals.year),
            nominal_formatted: format_money(totals.nominal_balance),
            real_formatted: format_money(totals.real_balance),
            contributed_formatted: format_money(totals.cumulative_contributed),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    config: SimulationConfig,
    months: u32,
    summary: SummaryResponse,
    snapshots: Vec<YearlySnapshot>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn check_finite(flag: &'static str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::NonFinite { flag })
    }
}

fn build_config(cli: Cli) -> Result<SimulationConfig, InputError> {
    let initial = check_finite("initial", cli.initial)?;
    let periodic_contribution = check_finite("monthly", cli.monthly)?;
    let horizon_years = check_finite("years", cli.years)?;
    let annual_return_rate = check_finite("annual-return-rate", cli.annual_return_rate)?;
    let annual_inflation_rate = check_finite("annual-inflation-rate", cli.annual_inflation_rate)?;

    if initial < 0.0 {
        return Err(InputError::Negative { flag: "initial" });
    }
    if periodic_contribution < 0.0 {
        return Err(InputError::Negative { flag: "monthly" });
    }
    if horizon_years > MAX_HORIZON_YEARS {
        return Err(InputError::HorizonTooLong {
            max: MAX_HORIZON_YEARS,
        });
    }

    Ok(SimulationConfig {
        initial,
        periodic_contribution,
        horizon_years,
        annual_return_rate,
        annual_inflation_rate,
        compounding_frequency: cli.frequency.into(),
    })
}

fn build_simulate_response(config: SimulationConfig) -> SimulateResponse {
    let snapshots = simulate(&config);
    SimulateResponse {
        config,
        months: horizon_months(config.horizon_years),
        summary: summarize(&snapshots).into(),
        snapshots,
    }
}

/// Runs a projection from command-line arguments and returns the rendered
/// output for stdout.
pub fn run_cli<I, T>(args: I) -> Result<String, RunError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let output = cli.output;
    let config = build_config(cli)?;
    debug!(?config, "running projection from CLI");

    match output {
        OutputFormat::Json => {
            let response = build_simulate_response(config);
            Ok(format!("{}\n", serde_json::to_string_pretty(&response)?))
        }
        OutputFormat::Table => {
            let snapshots = simulate(&config);
            let mut out = render_table(&snapshots);
            out.push('\n');
            out.push_str(&render_summary(&summarize(&snapshots)));
            Ok(out)
        }
    }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "savings projection API listening");
    info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(api_config_from_payload(payload))
}

async fn simulate_post_handler(body: Bytes) -> Response {
    simulate_handler_impl(api_config_from_json(&body))
}

fn simulate_handler_impl(config: Result<SimulationConfig, InputError>) -> Response {
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "rejected simulate request");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    debug!(?config, "running projection");
    json_response(StatusCode::OK, build_simulate_response(config))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn api_config_from_json(json: &[u8]) -> Result<SimulationConfig, InputError> {
    let payload = if json.iter().all(u8::is_ascii_whitespace) {
        SimulatePayload::default()
    } else {
        serde_json::from_slice::<SimulatePayload>(json)
            .map_err(|e| InputError::Payload(e.to_string()))?
    };
    api_config_from_payload(payload)
}

fn api_config_from_payload(payload: SimulatePayload) -> Result<SimulationConfig, InputError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.initial {
        cli.initial = v.value();
    }
    if let Some(v) = payload.periodic_contribution {
        cli.monthly = v.value();
    }
    if let Some(v) = payload.horizon_years {
        cli.years = v.value();
    }
    if let Some(v) = payload.annual_return_rate {
        cli.annual_return_rate = v.value();
    }
    if let Some(v) = payload.annual_inflation_rate {
        cli.annual_inflation_rate = v.value();
    }
    if let Some(v) = payload.compounding_frequency {
        cli.frequency = v.into();
    }

    build_config(cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        initial: 600.0,
        monthly: 600.0,
        years: 30.0,
        annual_return_rate: 10.0,
        annual_inflation_rate: 3.0,
        frequency: CliCompoundingFrequency::Annually,
        output: OutputFormat::Json,
    }
}
