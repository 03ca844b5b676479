use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    ConsumptionParams, DEFAULT_INFLATION_PERCENT, IntegrationMethod, InflationScenario,
    MonthlySummary, ScenarioMetrics, ScenarioResult, TimeSample, compute_scenario,
    default_inflation_table, spending_range,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliMethod {
    Rectangle,
    Trapezoidal,
    Simpson,
}

impl From<CliMethod> for IntegrationMethod {
    fn from(value: CliMethod) -> Self {
        match value {
            CliMethod::Rectangle => IntegrationMethod::Rectangle,
            CliMethod::Trapezoidal => IntegrationMethod::Trapezoidal,
            CliMethod::Simpson => IntegrationMethod::Simpson,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliScenario {
    Base,
    Optimistic,
    Critical,
    Custom,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiMethod {
    #[serde(alias = "rectangles", alias = "midpoint")]
    Rectangle,
    #[serde(alias = "trapezoid", alias = "trapezoids")]
    Trapezoidal,
    Simpson,
}

impl From<ApiMethod> for CliMethod {
    fn from(value: ApiMethod) -> Self {
        match value {
            ApiMethod::Rectangle => CliMethod::Rectangle,
            ApiMethod::Trapezoidal => CliMethod::Trapezoidal,
            ApiMethod::Simpson => CliMethod::Simpson,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiScenario {
    Base,
    #[serde(alias = "lower")]
    Optimistic,
    #[serde(alias = "higher")]
    Critical,
    Custom,
}

impl From<ApiScenario> for CliScenario {
    fn from(value: ApiScenario) -> Self {
        match value {
            ApiScenario::Base => CliScenario::Base,
            ApiScenario::Optimistic => CliScenario::Optimistic,
            ApiScenario::Critical => CliScenario::Critical,
            ApiScenario::Custom => CliScenario::Custom,
        }
    }
}

/// JSON bodies carry a list; query strings carry `inflation=0.24,-0.13,...`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InflationInput {
    List(Vec<f64>),
    Csv(String),
}

impl InflationInput {
    fn into_values(self) -> Result<Vec<f64>, String> {
        match self {
            InflationInput::List(values) => Ok(values),
            InflationInput::Csv(raw) => parse_inflation_csv(&raw),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ScenarioPayload {
    alpha: Option<f64>,
    beta: Option<f64>,
    gamma: Option<f64>,
    variation_pct: Option<f64>,
    seasonality_pct: Option<f64>,
    inflation: Option<InflationInput>,
    scenario: Option<ApiScenario>,
    factor: Option<f64>,
    method: Option<ApiMethod>,
}

#[derive(Parser, Debug)]
#[command(
    name = "seasonal-budget",
    about = "Real annual cost of a seasonal spending pattern under a monthly inflation path"
)]
struct Cli {
    #[arg(long, default_value_t = 1_500_000.0, help = "Typical monthly spend")]
    alpha: f64,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Gap between cheapest and dearest months, percent of alpha (0-50)"
    )]
    variation_pct: f64,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Weight of seasonal months, percent of alpha (0-30)"
    )]
    seasonality_pct: f64,
    #[arg(long, help = "Absolute cosine amplitude; overrides --variation-pct")]
    beta: Option<f64>,
    #[arg(long, help = "Absolute sine amplitude; overrides --seasonality-pct")]
    gamma: Option<f64>,
    #[arg(
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        help = "Twelve monthly inflation percentages; defaults to the reference table"
    )]
    inflation: Vec<f64>,
    #[arg(long, value_enum, default_value_t = CliScenario::Base)]
    scenario: CliScenario,
    #[arg(
        long,
        default_value_t = 1.0,
        help = "Inflation multiplier for the custom scenario (0.2-2.0)"
    )]
    factor: f64,
    #[arg(long, value_enum, default_value_t = CliMethod::Simpson)]
    method: CliMethod,
}

#[derive(Debug, Clone)]
struct Inputs {
    params: ConsumptionParams,
    inflation_percent: Vec<f64>,
    scenario: InflationScenario,
    method: IntegrationMethod,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpendingBand {
    min: f64,
    max: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioResponse {
    method: IntegrationMethod,
    inflation_factor: f64,
    params: ConsumptionParams,
    spending_band: SpendingBand,
    scaled_inflation: Vec<f64>,
    metrics: ScenarioMetrics,
    monthly: Vec<MonthlySummary>,
    series: Vec<TimeSample>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DefaultMonth {
    month: &'static str,
    inflation_pct: f64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn parse_inflation_csv(raw: &str) -> Result<Vec<f64>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| format!("inflation value {s:?} is not a number"))
        })
        .collect()
}

fn build_inputs(cli: Cli) -> Result<Inputs, String> {
    if !cli.alpha.is_finite() || cli.alpha < 0.0 {
        return Err("--alpha must be >= 0".to_string());
    }

    if !(0.0..=50.0).contains(&cli.variation_pct) {
        return Err("--variation-pct must be between 0 and 50".to_string());
    }

    if !(0.0..=30.0).contains(&cli.seasonality_pct) {
        return Err("--seasonality-pct must be between 0 and 30".to_string());
    }

    if cli.beta.is_some_and(|v| !v.is_finite()) {
        return Err("--beta must be finite".to_string());
    }

    if cli.gamma.is_some_and(|v| !v.is_finite()) {
        return Err("--gamma must be finite".to_string());
    }

    if cli.inflation.iter().any(|p| !p.is_finite()) {
        return Err("--inflation values must be finite".to_string());
    }

    let scenario = match cli.scenario {
        CliScenario::Base => InflationScenario::Base,
        CliScenario::Optimistic => InflationScenario::Optimistic,
        CliScenario::Critical => InflationScenario::Critical,
        CliScenario::Custom => {
            if !(0.2..=2.0).contains(&cli.factor) {
                return Err("--factor must be between 0.2 and 2.0".to_string());
            }
            InflationScenario::Custom(cli.factor)
        }
    };

    let inflation_percent = if cli.inflation.is_empty() {
        DEFAULT_INFLATION_PERCENT.to_vec()
    } else {
        cli.inflation
    };

    Ok(Inputs {
        params: ConsumptionParams {
            alpha: cli.alpha,
            beta: cli.beta.unwrap_or(cli.variation_pct / 100.0 * cli.alpha),
            gamma: cli.gamma.unwrap_or(cli.seasonality_pct / 100.0 * cli.alpha),
        },
        inflation_percent,
        scenario,
        method: cli.method.into(),
    })
}

/// One-shot evaluation from command-line flags; returns the JSON response.
pub fn run_cli<I, T>(args: I) -> Result<String, String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;
    let inputs = build_inputs(cli)?;
    let response = evaluate(&inputs)?;
    serde_json::to_string_pretty(&response).map_err(|e| format!("failed to encode result: {e}"))
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "seasonal budget API listening");

    axum::serve(listener, app).await
}

fn router() -> Router {
    Router::new()
        .route(
            "/api/scenario",
            get(scenario_get_handler).post(scenario_post_handler),
        )
        .route("/api/defaults", get(defaults_handler))
        .fallback(not_found_handler)
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn defaults_handler() -> Response {
    let months: Vec<DefaultMonth> = default_inflation_table()
        .into_iter()
        .map(|(month, inflation_pct)| DefaultMonth {
            month,
            inflation_pct,
        })
        .collect();
    json_response(StatusCode::OK, months)
}

async fn scenario_get_handler(Query(payload): Query<ScenarioPayload>) -> Response {
    scenario_handler_impl(payload).await
}

async fn scenario_post_handler(Json(payload): Json<ScenarioPayload>) -> Response {
    scenario_handler_impl(payload).await
}

async fn scenario_handler_impl(payload: ScenarioPayload) -> Response {
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => {
            warn!(error = %msg, "invalid scenario request");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    match evaluate(&inputs) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => {
            warn!(error = %msg, "scenario rejected");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, &msg)
        }
    }
}

fn evaluate(inputs: &Inputs) -> Result<ScenarioResponse, String> {
    let result = compute_scenario(
        &inputs.params,
        &inputs.inflation_percent,
        inputs.scenario.factor(),
        inputs.method,
    )
    .map_err(|e| e.to_string())?;
    Ok(build_scenario_response(inputs, &result))
}

fn with_no_store(mut response: Response) -> Response {
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_no_store((status, Json(body)).into_response())
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<Inputs, String> {
    let payload = serde_json::from_str::<ScenarioPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload)
}

fn inputs_from_payload(payload: ScenarioPayload) -> Result<Inputs, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.alpha {
        cli.alpha = v;
    }
    if let Some(v) = payload.variation_pct {
        cli.variation_pct = v;
    }
    if let Some(v) = payload.seasonality_pct {
        cli.seasonality_pct = v;
    }
    if let Some(v) = payload.beta {
        cli.beta = Some(v);
    }
    if let Some(v) = payload.gamma {
        cli.gamma = Some(v);
    }
    if let Some(v) = payload.inflation {
        cli.inflation = v.into_values()?;
    }
    if let Some(v) = payload.factor {
        cli.factor = v;
        cli.scenario = CliScenario::Custom;
    }
    if let Some(v) = payload.scenario {
        cli.scenario = v.into();
    }
    if let Some(v) = payload.method {
        cli.method = v.into();
    }

    build_inputs(cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        alpha: 1_500_000.0,
        variation_pct: 10.0,
        seasonality_pct: 5.0,
        beta: None,
        gamma: None,
        inflation: Vec::new(),
        scenario: CliScenario::Base,
        factor: 1.0,
        method: CliMethod::Simpson,
    }
}

fn build_scenario_response(inputs: &Inputs, result: &ScenarioResult) -> ScenarioResponse {
    let (min, max) = spending_range(&inputs.params);
    ScenarioResponse {
        method: result.method,
        inflation_factor: inputs.scenario.factor(),
        params: inputs.params,
        spending_band: SpendingBand { min, max },
        scaled_inflation: result.scaled_inflation.to_vec(),
        metrics: result.metrics,
        monthly: result.monthly.clone(),
        series: result.time_series(),
    }
}
