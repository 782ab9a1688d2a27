//! HTTP handler functions for the incident dashboard API.

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use incident_dashboard_analytics::{filter, views};
use incident_dashboard_analytics_models::FilterOptions;
use incident_dashboard_dataset::export::{CONTENT_TYPE, DEFAULT_FILE_NAME, to_csv_bytes};
use incident_dashboard_incident_models::{FilterCriteria, Incident, YearRange};
use incident_dashboard_server_models::{
    ApiDashboard, ApiError, ApiHealth, ApiIncidentPage, ApiIncidentRow, FilterQueryParams,
    PageQueryParams,
};

use crate::AppState;

const DEFAULT_PAGE_SIZE: u32 = 100;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let version = env!("CARGO_PKG_VERSION").to_string();

    match state.dataset() {
        Ok(dataset) => HttpResponse::Ok().json(ApiHealth {
            healthy: true,
            version,
            incident_count: dataset.len() as u64,
        }),
        Err(e) => {
            log::error!("Dataset unavailable: {e}");
            HttpResponse::ServiceUnavailable().json(ApiHealth {
                healthy: false,
                version,
                incident_count: 0,
            })
        }
    }
}

/// `GET /api/options`
///
/// Returns the year bounds, states and attack types offered by the filter
/// controls.
pub async fn options(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(&state.options)
}

/// `GET /api/dashboard`
///
/// Computes every view for the selection. An empty selection is a normal
/// response with `empty: true` and a notice.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    let selection = match select(&state, &params) {
        Ok(selection) => selection,
        Err(response) => return response,
    };

    HttpResponse::Ok().json(ApiDashboard::from(views::dashboard(&selection)))
}

/// `GET /api/incidents`
///
/// Returns one page of the detail table for the selection.
pub async fn incidents(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
    page: web::Query<PageQueryParams>,
) -> HttpResponse {
    let selection = match select(&state, &params) {
        Ok(selection) => selection,
        Err(response) => return response,
    };

    let limit = page.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let offset = page.offset.unwrap_or(0);

    let rows: Vec<ApiIncidentRow> = selection
        .iter()
        .skip(offset as usize)
        .take(limit as usize)
        .map(ApiIncidentRow::from)
        .collect();

    HttpResponse::Ok().json(ApiIncidentPage {
        total: selection.len() as u64,
        offset,
        limit,
        rows,
    })
}

/// `GET /api/export`
///
/// Downloads the selection as CSV in the original column layout.
pub async fn export(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    let selection = match select(&state, &params) {
        Ok(selection) => selection,
        Err(response) => return response,
    };

    match to_csv_bytes(&selection) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type(format!("{CONTENT_TYPE}; charset=utf-8"))
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DEFAULT_FILE_NAME}\""),
            ))
            .body(bytes),
        Err(e) => {
            log::error!("Failed to export incidents: {e}");
            HttpResponse::InternalServerError().json(ApiError {
                error: "Failed to export incidents".to_string(),
            })
        }
    }
}

/// Builds the criteria for a request and filters the shared dataset.
///
/// Returns a `400` response when both year bounds are given and inverted,
/// and a `500` response if the dataset is unavailable.
fn select(state: &AppState, params: &FilterQueryParams) -> Result<Vec<Incident>, HttpResponse> {
    let criteria = build_criteria(params, &state.options).map_err(|error| {
        log::debug!("Rejected filter: {error}");
        HttpResponse::BadRequest().json(ApiError { error })
    })?;

    let dataset = state.dataset().map_err(|e| {
        log::error!("Dataset unavailable: {e}");
        HttpResponse::InternalServerError().json(ApiError {
            error: "Dataset unavailable".to_string(),
        })
    })?;

    Ok(filter::apply(dataset.incidents(), &criteria))
}

/// Translates query parameters into criteria. Missing year bounds default
/// to the dataset's own bounds.
///
/// Only an explicitly inverted pair of bounds is rejected. A single bound
/// outside the dataset's years selects nothing.
fn build_criteria(
    params: &FilterQueryParams,
    options: &FilterOptions,
) -> Result<FilterCriteria, String> {
    if let (Some(from), Some(to)) = (params.year_from, params.year_to)
        && from > to
    {
        return Err(format!("yearFrom ({from}) must not be after yearTo ({to})"));
    }

    let bounds = options.year_bounds.unwrap_or_default();
    let year_range = YearRange::new(
        params.year_from.unwrap_or(bounds.min),
        params.year_to.unwrap_or(bounds.max),
    );

    Ok(FilterCriteria::new(year_range)
        .with_states(parse_list(params.states.as_deref()))
        .with_attack_types(parse_list(params.attack_types.as_deref())))
}

/// Splits a comma-separated selection, dropping blank entries.
fn parse_list(s: Option<&str>) -> Vec<&str> {
    s.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::App;
    use actix_web::test as actix_test;
    use tempfile::TempDir;

    use super::*;
    use crate::configure;

    const DATA: &str = "\
Date,State,City,Attack Type,Target Type,Casualties,Perpetrators,Weapons Used,Sources,Summary
2020-01-01,A,Xpur,Bombing,Civilians,5,Group One,IED,https://example.org/1,First blast
2020-06-15,B,Ygarh,Armed Assault,Police,0,Unknown,Rifles,https://example.org/2,Ambush
2021-03-01,A,Xpur,Bombing,Civilians,10,Group One,IED,https://example.org/3,Second blast
";

    fn state() -> (TempDir, web::Data<AppState>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("incidents.csv");
        std::fs::write(&path, DATA).unwrap();
        let state = web::Data::new(AppState::load(path).unwrap());
        (dir, state)
    }

    #[test]
    fn parses_comma_separated_lists() {
        assert_eq!(parse_list(Some("A, B,,C ")), ["A", "B", "C"]);
        assert!(parse_list(Some("")).is_empty());
        assert!(parse_list(None).is_empty());
    }

    #[test]
    fn criteria_default_to_dataset_bounds() {
        let options = FilterOptions {
            year_bounds: Some(YearRange::new(2001, 2020)),
            ..FilterOptions::default()
        };
        let criteria = build_criteria(&FilterQueryParams::default(), &options).unwrap();
        assert_eq!(criteria.year_range, YearRange::new(2001, 2020));
        assert!(criteria.states.is_empty());
    }

    #[test]
    fn inverted_year_range_is_rejected() {
        let params = FilterQueryParams {
            year_from: Some(2021),
            year_to: Some(2020),
            ..FilterQueryParams::default()
        };
        assert!(build_criteria(&params, &FilterOptions::default()).is_err());
    }

    #[actix_web::test]
    async fn dashboard_for_single_year() {
        let (_dir, state) = state();
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/dashboard?yearFrom=2020&yearTo=2020")
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["empty"], false);
        assert!(body["notice"].is_null());
        let metrics = &body["dashboard"]["metrics"];
        assert_eq!(metrics["totalIncidents"], 2);
        assert_eq!(metrics["totalCasualties"], 5);
        assert_eq!(metrics["meanCasualties"], 2.5);
        assert_eq!(metrics["mostCommonAttackType"], "Bombing");
        assert_eq!(
            body["dashboard"]["incidentsOverTime"],
            serde_json::json!([
                { "period": "2020-01", "count": 1 },
                { "period": "2020-06", "count": 1 }
            ])
        );
    }

    #[actix_web::test]
    async fn empty_state_selection_means_all_states() {
        let (_dir, state) = state();
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/dashboard?states=")
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["dashboard"]["metrics"]["totalIncidents"], 3);
    }

    #[actix_web::test]
    async fn empty_selection_returns_notice() {
        let (_dir, state) = state();
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/dashboard?states=Nowhere")
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["empty"], true);
        assert_eq!(
            body["notice"],
            incident_dashboard_server_models::EMPTY_SELECTION_NOTICE
        );
        assert_eq!(body["dashboard"]["metrics"]["meanCasualties"], serde_json::Value::Null);
        assert_eq!(body["dashboard"]["attackTypes"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn inverted_range_is_bad_request() {
        let (_dir, state) = state();
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/dashboard?yearFrom=2022&yearTo=2020")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn single_bound_past_the_data_is_not_rejected() {
        let options = FilterOptions {
            year_bounds: Some(YearRange::new(2020, 2021)),
            ..FilterOptions::default()
        };
        let params = FilterQueryParams {
            year_from: Some(2022),
            ..FilterQueryParams::default()
        };
        let criteria = build_criteria(&params, &options).unwrap();
        assert_eq!(criteria.year_range, YearRange::new(2022, 2021));
    }

    #[actix_web::test]
    async fn year_from_after_last_year_is_empty_selection() {
        let (_dir, state) = state();
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/dashboard?yearFrom=2022")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["empty"], true);
        assert_eq!(
            body["notice"],
            incident_dashboard_server_models::EMPTY_SELECTION_NOTICE
        );
    }

    #[actix_web::test]
    async fn year_to_before_first_year_is_empty_selection() {
        let (_dir, state) = state();
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/incidents?yearTo=2019")
            .to_request();
        let page: ApiIncidentPage = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(page.total, 0);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn requests_share_the_loaded_dataset() {
        let (dir, state) = state();
        let first = state.dataset().unwrap();

        std::fs::write(dir.path().join("incidents.csv"), "Date,State\n2020-01-01,A\n").unwrap();
        let second = state.dataset().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 3);
    }

    #[actix_web::test]
    async fn incidents_are_paged() {
        let (_dir, state) = state();
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/incidents?states=A&limit=1&offset=1")
            .to_request();
        let page: ApiIncidentPage = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(page.total, 2);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].date, "2021-03-01");
        assert_eq!(page.rows[0].casualties, Some(10));
    }

    #[actix_web::test]
    async fn export_downloads_filtered_csv() {
        let (_dir, state) = state();
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/export?attackTypes=Armed%20Assault")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains(DEFAULT_FILE_NAME));

        let body = actix_test::read_body(resp).await;
        let text = std::str::from_utf8(&body).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Date,State,City,Attack Type"));
        assert!(lines[1].starts_with("2020-06-15,B,Ygarh,Armed Assault"));
    }

    #[actix_web::test]
    async fn options_and_health() {
        let (_dir, state) = state();
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = actix_test::TestRequest::get().uri("/api/options").to_request();
        let options: FilterOptions = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(options.year_bounds, Some(YearRange::new(2020, 2021)));
        assert_eq!(options.states, ["A", "B"]);

        let req = actix_test::TestRequest::get().uri("/api/health").to_request();
        let health: ApiHealth = actix_test::call_and_read_body_json(&app, req).await;
        assert!(health.healthy);
        assert_eq!(health.incident_count, 3);
    }
}
