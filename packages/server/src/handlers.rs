//! HTTP handler functions for the age map API.

use actix_web::{HttpResponse, web};
use age_map_engine::dashboard::DashboardState;
use age_map_population_models::{DisplayMode, FeatureCollectionType, HexFeatureCollection};
use age_map_server_models::{
    ApiDistricts, ApiFeature, ApiHealth, ApiLegend, ApiMap, ApiZone, DashboardQueryParams,
};

use crate::AppState;
use crate::query::{QueryError, build_dashboard, parse_mode};

/// `GET /hex-population`
///
/// The loaded hex cells, unchanged. Empty when the dataset is absent.
pub async fn hex_population(state: web::Data<AppState>) -> HttpResponse {
    match &state.data.hexes {
        Some(collection) => HttpResponse::Ok().json(collection),
        None => HttpResponse::Ok().json(HexFeatureCollection::default()),
    }
}

/// `GET /district-population-chart`
///
/// The loaded chart series, unchanged. Empty when the dataset is absent.
pub async fn district_population_chart(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.data.chart())
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        hexes_loaded: state.data.hexes.is_some(),
        chart_loaded: state.data.chart.is_some(),
    })
}

/// `GET /api/map`
///
/// Visible cells styled for the requested mode and filters.
pub async fn map(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let dashboard = match dashboard(&state, &params) {
        Ok(dashboard) => dashboard,
        Err(response) => return response,
    };

    let features: Vec<ApiFeature> = dashboard
        .styled_features(state.data.hexes())
        .iter()
        .map(ApiFeature::from)
        .collect();
    log::debug!("Map request matched {} cells", features.len());

    HttpResponse::Ok().json(ApiMap {
        kind: FeatureCollectionType::FeatureCollection,
        features,
        selection: dashboard.selection().clone(),
    })
}

/// `GET /api/chart`
///
/// District chart bars that pass the zone and exclusion filters.
pub async fn chart(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    match dashboard(&state, &params) {
        Ok(dashboard) => {
            HttpResponse::Ok().json(dashboard.visible_chart_series(state.data.chart()))
        }
        Err(response) => response,
    }
}

/// `GET /api/districts`
///
/// Districts present in the loaded cells, and those selectable under the
/// requested zone.
pub async fn districts(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    match dashboard(&state, &params) {
        Ok(dashboard) => {
            let hexes = state.data.hexes();
            HttpResponse::Ok().json(ApiDistricts {
                zone: dashboard.selection().zone,
                all: DashboardState::distinct_districts(hexes),
                selectable: dashboard.selectable_districts(hexes),
            })
        }
        Err(response) => response,
    }
}

/// `GET /api/legend`
pub async fn legend(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let mode: DisplayMode = match parse_mode(params.mode.as_deref()) {
        Ok(mode) => mode,
        Err(e) => return bad_request(&e),
    };
    let mut dashboard = DashboardState::new(state.config.clone());
    dashboard.set_display_mode(mode);

    HttpResponse::Ok().json(ApiLegend {
        mode,
        entries: dashboard.legend(),
    })
}

/// `GET /api/summary`
///
/// Bucket counts and density range over the visible cells.
pub async fn summary(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    match dashboard(&state, &params) {
        Ok(dashboard) => HttpResponse::Ok().json(dashboard.summary(state.data.hexes())),
        Err(response) => response,
    }
}

/// `GET /api/zones`
pub async fn zones(state: web::Data<AppState>) -> HttpResponse {
    let zones: Vec<ApiZone> = state
        .config
        .zones
        .iter()
        .map(|(zone, districts)| ApiZone {
            zone,
            label: zone.label().to_string(),
            districts: districts.iter().cloned().collect(),
        })
        .collect();

    HttpResponse::Ok().json(zones)
}

fn dashboard(
    state: &AppState,
    params: &DashboardQueryParams,
) -> Result<DashboardState, HttpResponse> {
    build_dashboard(state.config.clone(), params).map_err(|e| bad_request(&e))
}

fn bad_request(e: &QueryError) -> HttpResponse {
    log::warn!("Rejected dashboard query: {e}");
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": e.to_string()
    }))
}
