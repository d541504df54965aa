use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::policy::{TARGET_RUNWAY_DEFAULT_DAYS, TARGET_RUNWAY_MAX_DAYS, TARGET_RUNWAY_MIN_DAYS};
use crate::core::{
    BaselineProfile, Diagnosis, EqualizerBounds, EqualizerReading, RepairRequirements, ScoreBand,
    StressTestResult, diagnose, equalizer_bounds, evaluate_adjustment, health_score,
    run_stress_tests, runway_days, solve_for_target,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Parser, Debug)]
#[command(
    name = "runway",
    about = "Financial stress-test engine (runway, health score, shock battery, repair solver)"
)]
struct Cli {
    #[arg(long, help = "Monthly take-home income")]
    income: f64,
    #[arg(long, help = "Monthly rent or mortgage payment")]
    rent: f64,
    #[arg(long, help = "Monthly transportation cost")]
    transportation: f64,
    #[arg(long, help = "Monthly groceries cost")]
    groceries: f64,
    #[arg(long, help = "Other monthly spending")]
    other: f64,
    #[arg(long, help = "Liquid savings accessible within 24 hours")]
    savings: f64,
    #[arg(
        long,
        default_value_t = TARGET_RUNWAY_DEFAULT_DAYS,
        help = "Target runway in days for the repair solver"
    )]
    target_runway: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AssessPayload {
    income: Option<f64>,
    rent: Option<f64>,
    transportation: Option<f64>,
    groceries: Option<f64>,
    other: Option<f64>,
    savings: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RepairPayload {
    income: Option<f64>,
    rent: Option<f64>,
    transportation: Option<f64>,
    groceries: Option<f64>,
    other: Option<f64>,
    savings: Option<f64>,
    target_runway: Option<u32>,
    slider_income: Option<f64>,
    slider_expenses: Option<f64>,
    slider_savings: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosisEntry {
    id: Diagnosis,
    label: &'static str,
    description: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssessResponse {
    profile: BaselineProfile,
    fixed_expenses: f64,
    flexible_expenses: f64,
    total_expenses: f64,
    burn_rate: f64,
    runway_days: u32,
    health_score: u32,
    score_band: ScoreBand,
    score_band_label: &'static str,
    tests: [StressTestResult; 3],
    passed_count: usize,
    diagnoses: Vec<DiagnosisEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RepairResponse {
    target_runway_days: u32,
    baseline_runway_days: u32,
    requirements: RepairRequirements,
    bounds: EqualizerBounds,
    reading: EqualizerReading,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn default_cli_for_api() -> Cli {
    // Demo profile shown by the front end's "Use Demo Profile" button.
    Cli {
        income: 4_000.0,
        rent: 1_200.0,
        transportation: 300.0,
        groceries: 400.0,
        other: 300.0,
        savings: 3_000.0,
        target_runway: TARGET_RUNWAY_DEFAULT_DAYS,
    }
}

fn build_profile(cli: &Cli) -> Result<BaselineProfile, String> {
    for (name, value) in [
        ("--income", cli.income),
        ("--rent", cli.rent),
        ("--transportation", cli.transportation),
        ("--groceries", cli.groceries),
        ("--other", cli.other),
        ("--savings", cli.savings),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{name} must be a finite amount >= 0"));
        }
    }

    Ok(BaselineProfile {
        income: cli.income,
        rent: cli.rent,
        transportation: cli.transportation,
        groceries: cli.groceries,
        other: cli.other,
        savings: cli.savings,
    })
}

fn profile_from_assess_payload(payload: AssessPayload) -> Result<BaselineProfile, String> {
    let mut cli = default_cli_for_api();
    if let Some(v) = payload.income {
        cli.income = v;
    }
    if let Some(v) = payload.rent {
        cli.rent = v;
    }
    if let Some(v) = payload.transportation {
        cli.transportation = v;
    }
    if let Some(v) = payload.groceries {
        cli.groceries = v;
    }
    if let Some(v) = payload.other {
        cli.other = v;
    }
    if let Some(v) = payload.savings {
        cli.savings = v;
    }
    build_profile(&cli)
}

#[derive(Debug)]
struct RepairRequest {
    profile: BaselineProfile,
    target_days: u32,
    slider_income: f64,
    slider_expenses: f64,
    slider_savings: f64,
}

fn repair_request_from_payload(payload: RepairPayload) -> Result<RepairRequest, String> {
    let profile = profile_from_assess_payload(AssessPayload {
        income: payload.income,
        rent: payload.rent,
        transportation: payload.transportation,
        groceries: payload.groceries,
        other: payload.other,
        savings: payload.savings,
    })?;

    let target_days = payload
        .target_runway
        .unwrap_or(default_cli_for_api().target_runway)
        .clamp(TARGET_RUNWAY_MIN_DAYS, TARGET_RUNWAY_MAX_DAYS);

    for (name, value) in [
        ("sliderIncome", payload.slider_income),
        ("sliderExpenses", payload.slider_expenses),
        ("sliderSavings", payload.slider_savings),
    ] {
        if let Some(v) = value {
            if !v.is_finite() {
                return Err(format!("{name} must be a finite amount"));
            }
        }
    }

    // Sliders default to the baseline triple on entry to repair mode.
    Ok(RepairRequest {
        profile,
        target_days,
        slider_income: payload.slider_income.unwrap_or(profile.income),
        slider_expenses: payload.slider_expenses.unwrap_or(profile.total_expenses()),
        slider_savings: payload.slider_savings.unwrap_or(profile.savings),
    })
}

fn build_assess_response(profile: &BaselineProfile) -> AssessResponse {
    let total_expenses = profile.total_expenses();
    let score = health_score(profile.income, total_expenses, profile.savings);
    let band = ScoreBand::from_score(score);
    let tests = run_stress_tests(profile.income, total_expenses, profile.savings);
    let passed_count = tests.iter().filter(|t| t.passed).count();
    let diagnoses = diagnose(profile)
        .into_iter()
        .map(|d| DiagnosisEntry {
            id: d,
            label: d.label(),
            description: d.description(),
        })
        .collect();

    AssessResponse {
        profile: *profile,
        fixed_expenses: profile.fixed_expenses(),
        flexible_expenses: profile.flexible_expenses(),
        total_expenses,
        burn_rate: profile.burn_rate(),
        runway_days: runway_days(total_expenses, profile.savings),
        health_score: score,
        score_band: band,
        score_band_label: band.label(),
        tests,
        passed_count,
        diagnoses,
    }
}

fn build_repair_response(request: &RepairRequest) -> RepairResponse {
    let profile = &request.profile;
    RepairResponse {
        target_runway_days: request.target_days,
        baseline_runway_days: runway_days(profile.total_expenses(), profile.savings),
        requirements: solve_for_target(profile, request.target_days),
        bounds: equalizer_bounds(profile),
        reading: evaluate_adjustment(
            profile,
            request.slider_income,
            request.slider_expenses,
            request.slider_savings,
        ),
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
            "/api/assess",
            get(assess_get_handler).post(assess_post_handler),
        )
        .route(
            "/api/repair",
            get(repair_get_handler).post(repair_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("Stress-test HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

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

async fn assess_get_handler(Query(payload): Query<AssessPayload>) -> Response {
    assess_handler_impl(payload)
}

async fn assess_post_handler(Json(payload): Json<AssessPayload>) -> Response {
    assess_handler_impl(payload)
}

fn assess_handler_impl(payload: AssessPayload) -> Response {
    match profile_from_assess_payload(payload) {
        Ok(profile) => json_response(StatusCode::OK, build_assess_response(&profile)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn repair_get_handler(Query(payload): Query<RepairPayload>) -> Response {
    repair_handler_impl(payload)
}

async fn repair_post_handler(Json(payload): Json<RepairPayload>) -> Response {
    repair_handler_impl(payload)
}

fn repair_handler_impl(payload: RepairPayload) -> Response {
    match repair_request_from_payload(payload) {
        Ok(request) => json_response(StatusCode::OK, build_repair_response(&request)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
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
mod tests {
    use super::*;

    fn assess_from_json(json: &str) -> Result<BaselineProfile, String> {
        let payload = serde_json::from_str::<AssessPayload>(json)
            .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
        profile_from_assess_payload(payload)
    }

    fn repair_from_json(json: &str) -> Result<RepairRequest, String> {
        let payload = serde_json::from_str::<RepairPayload>(json)
            .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
        repair_request_from_payload(payload)
    }

    #[test]
    fn assess_payload_merges_over_demo_defaults() {
        let profile = assess_from_json(r#"{ "income": 2500, "savings": 1000 }"#)
            .expect("valid payload");
        assert_eq!(profile.income, 2_500.0);
        assert_eq!(profile.savings, 1_000.0);
        // Untouched fields come from the demo profile.
        assert_eq!(profile.rent, 1_200.0);
        assert_eq!(profile.groceries, 400.0);
    }

    #[test]
    fn assess_payload_rejects_negative_amounts() {
        let err = assess_from_json(r#"{ "rent": -10 }"#).expect_err("must reject");
        assert!(err.contains("--rent"));
    }

    #[test]
    fn build_profile_rejects_non_finite_amounts() {
        let mut cli = default_cli_for_api();
        cli.savings = f64::NAN;
        let err = build_profile(&cli).expect_err("must reject NaN");
        assert!(err.contains("--savings"));
    }

    #[test]
    fn assess_response_covers_all_three_stages() {
        let profile = build_profile(&default_cli_for_api()).expect("demo profile is valid");
        let response = build_assess_response(&profile);

        assert_eq!(response.total_expenses, 2_200.0);
        assert_eq!(response.burn_rate, 2_200.0);
        assert_eq!(response.runway_days, 40);
        assert_eq!(response.health_score, 59);
        assert_eq!(response.score_band_label, "Vulnerable");
        assert_eq!(response.tests.len(), 3);
        assert_eq!(response.passed_count, 2);
        assert!(response.diagnoses.is_empty());
    }

    #[test]
    fn assess_response_lists_diagnoses_with_display_text() {
        let profile = assess_from_json(
            r#"{
              "income": 2000,
              "rent": 1500,
              "transportation": 300,
              "groceries": 300,
              "other": 200,
              "savings": 200
            }"#,
        )
        .expect("valid payload");
        let response = build_assess_response(&profile);

        let ids: Vec<Diagnosis> = response.diagnoses.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![Diagnosis::Fixed, Diagnosis::Buffer, Diagnosis::Income]);
        assert_eq!(response.diagnoses[0].label, "Fixed expenses too high");
    }

    #[test]
    fn repair_request_defaults_sliders_to_baseline() {
        let request = repair_from_json(r#"{ "targetRunway": 120 }"#).expect("valid payload");
        assert_eq!(request.target_days, 120);
        assert_eq!(request.slider_income, 4_000.0);
        assert_eq!(request.slider_expenses, 2_200.0);
        assert_eq!(request.slider_savings, 3_000.0);
    }

    #[test]
    fn repair_request_clamps_target_to_supported_range() {
        let low = repair_from_json(r#"{ "targetRunway": 1 }"#).expect("valid payload");
        assert_eq!(low.target_days, TARGET_RUNWAY_MIN_DAYS);
        let high = repair_from_json(r#"{ "targetRunway": 4000 }"#).expect("valid payload");
        assert_eq!(high.target_days, TARGET_RUNWAY_MAX_DAYS);
    }

    #[test]
    fn repair_request_rejects_non_finite_sliders() {
        let payload = RepairPayload {
            slider_income: Some(f64::INFINITY),
            ..RepairPayload::default()
        };
        let err = repair_request_from_payload(payload).expect_err("must reject");
        assert!(err.contains("sliderIncome"));
    }

    #[test]
    fn repair_response_reads_clamped_sliders() {
        let request = repair_from_json(
            r#"{ "sliderExpenses": 100, "sliderSavings": 999999 }"#,
        )
        .expect("valid payload");
        let response = build_repair_response(&request);

        // Demo baseline: expenses clamp to 1100, savings to 9000.
        assert_eq!(response.reading.expenses, 1_100.0);
        assert_eq!(response.reading.savings, 9_000.0);
        assert_eq!(response.baseline_runway_days, 40);
        assert_eq!(response.bounds.expenses.max, 3_300.0);
    }

    #[test]
    fn repair_response_carries_solver_output() {
        let request = repair_from_json(
            r#"{
              "income": 2500,
              "rent": 1100,
              "transportation": 200,
              "groceries": 450,
              "other": 250,
              "savings": 1000,
              "targetRunway": 90
            }"#,
        )
        .expect("valid payload");
        let response = build_repair_response(&request);

        assert_eq!(response.requirements.required_savings, 6_000.0);
        assert_eq!(response.requirements.savings_increase, 5_000.0);
        assert!(!response.requirements.target_met);
    }

    #[test]
    fn responses_serialize_with_camel_case_keys() {
        let profile = build_profile(&default_cli_for_api()).expect("demo profile is valid");
        let json = serde_json::to_string(&build_assess_response(&profile))
            .expect("response serializes");
        assert!(json.contains("\"healthScore\":59"));
        assert!(json.contains("\"scoreBandLabel\":\"Vulnerable\""));
        assert!(json.contains("\"passedCount\":2"));
        assert!(json.contains("\"severity\":\"moderate\""));
    }
}
