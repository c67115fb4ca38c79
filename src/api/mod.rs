use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    InputParameters, ProjectionError, ProjectionReport, build_report, format_currency,
    run_projection,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectionPayload {
    invested_amount: Option<f64>,
    monthly_profit: Option<f64>,
    ownership_percentage: Option<f64>,
    include_stipend: Option<bool>,
    stipend_amount: Option<f64>,
    simulation_years: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "payback",
    about = "Cumulative profit-share withdrawals and break-even month for an invested amount"
)]
pub struct Cli {
    #[arg(long, default_value_t = 1_000_000.0, help = "Capital to be recovered")]
    invested_amount: f64,
    #[arg(
        long,
        default_value_t = 400_000.0,
        help = "Gross monthly profit of the venture"
    )]
    monthly_profit: f64,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Investor's share of profit in percent, 0 to 100"
    )]
    ownership_percentage: f64,
    #[arg(long, help = "Add a fixed monthly stipend to each withdrawal")]
    include_stipend: bool,
    #[arg(
        long,
        default_value_t = 12_000.0,
        help = "Fixed monthly stipend, used with --include-stipend"
    )]
    stipend_amount: f64,
    #[arg(long, default_value_t = 10, help = "Horizon in years, 1 to 10")]
    simulation_years: u32,
    #[arg(long, help = "Output machine-readable JSON")]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionResponse {
    inputs: InputParameters,
    #[serde(flatten)]
    report: ProjectionReport,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: &Cli) -> Result<InputParameters, String> {
    let inputs = InputParameters {
        invested_amount: cli.invested_amount,
        monthly_profit: cli.monthly_profit,
        ownership_percentage: cli.ownership_percentage,
        include_stipend: cli.include_stipend,
        stipend_amount: cli.stipend_amount,
        simulation_years: cli.simulation_years,
    };
    inputs.validate().map_err(|e| flag_message(&e))?;
    Ok(inputs)
}

fn flag_message(err: &ProjectionError) -> String {
    match err {
        ProjectionError::InvalidInput { field, constraint } => {
            format!("--{} {constraint}", field.replace('_', "-"))
        }
    }
}

fn project(inputs: &InputParameters) -> Result<ProjectionResponse, String> {
    let projection = run_projection(inputs).map_err(|e| flag_message(&e))?;
    Ok(ProjectionResponse {
        inputs: *inputs,
        report: build_report(&projection),
    })
}

/// Runs one projection from parsed flags and renders it for the terminal.
pub fn run_cli(cli: Cli) -> Result<String, String> {
    let inputs = build_inputs(&cli)?;
    let response = project(&inputs)?;
    if cli.json {
        return serde_json::to_string_pretty(&response)
            .map_err(|e| format!("Failed to serialize report: {e}"));
    }
    Ok(render_text_report(&response))
}

fn render_text_report(response: &ProjectionResponse) -> String {
    let report = &response.report;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Invested amount:           {}",
        format_currency(response.inputs.invested_amount)
    );
    let _ = writeln!(
        out,
        "Monthly profit withdrawal: {}",
        format_currency(report.derived_rates.profit_withdrawal)
    );
    let _ = writeln!(
        out,
        "Total monthly withdrawal:  {}",
        format_currency(report.derived_rates.total_monthly_withdrawal)
    );
    let _ = writeln!(out, "{}", report.break_even_summary);

    let _ = writeln!(out);
    let _ = writeln!(out, "Monthly detail");
    let _ = writeln!(
        out,
        "{:>4} {:>5} {:>18} {:>18} {:>18}",
        "Year", "Month", "Profit", "Stipend", "Total"
    );
    for row in &report.monthly_rows {
        let marker = if row.break_even { "  <- break-even" } else { "" };
        let _ = writeln!(
            out,
            "{:>4} {:>5} {:>18} {:>18} {:>18}{marker}",
            row.year_index,
            row.month_index,
            format_currency(row.accumulated_profit),
            format_currency(row.accumulated_stipend),
            format_currency(row.accumulated_total),
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Yearly detail");
    let _ = writeln!(
        out,
        "{:>4} {:>18} {:>18} {:>18}",
        "Year", "Profit", "Stipend", "Total"
    );
    for row in &report.yearly_rows {
        let _ = writeln!(
            out,
            "{:>4} {:>18} {:>18} {:>18}",
            row.year_number,
            format_currency(row.accumulated_profit),
            format_currency(row.accumulated_stipend),
            format_currency(row.accumulated_total),
        );
    }

    out
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/projection",
            get(projection_get_handler).post(projection_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("Payback HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/projection");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn projection_get_handler(Query(payload): Query<ProjectionPayload>) -> Response {
    projection_handler_impl(payload).await
}

async fn projection_post_handler(Json(payload): Json<ProjectionPayload>) -> Response {
    projection_handler_impl(payload).await
}

async fn projection_handler_impl(payload: ProjectionPayload) -> Response {
    debug!("projection request: {payload:?}");
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    match project(&inputs) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
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
fn inputs_from_json(json: &str) -> Result<InputParameters, String> {
    let payload = serde_json::from_str::<ProjectionPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload)
}

fn inputs_from_payload(payload: ProjectionPayload) -> Result<InputParameters, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.invested_amount {
        cli.invested_amount = v;
    }
    if let Some(v) = payload.monthly_profit {
        cli.monthly_profit = v;
    }
    if let Some(v) = payload.ownership_percentage {
        cli.ownership_percentage = v;
    }
    if let Some(v) = payload.include_stipend {
        cli.include_stipend = v;
    }
    if let Some(v) = payload.stipend_amount {
        cli.stipend_amount = v;
    }
    if let Some(v) = payload.simulation_years {
        cli.simulation_years = v;
    }

    build_inputs(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        invested_amount: 1_000_000.0,
        monthly_profit: 400_000.0,
        ownership_percentage: 5.0,
        include_stipend: false,
        stipend_amount: 12_000.0,
        simulation_years: 10,
        json: true,
    }
}
