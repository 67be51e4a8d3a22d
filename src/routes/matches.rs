use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{ErrorResponse, HealthResponse, ListMatchesResponse, RunMatchesRequest, RunMatchesResponse};
use crate::services::MatchStore;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MatchStore>,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches", web::get().to(list_matches))
        .route("/matches/run", web::post().to(run_matches));
}

fn error_response(status: u16, error: &str, message: String) -> ErrorResponse {
    ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status,
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = state.store.repository().health_check().await.unwrap_or(false);

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Recompute and store the match set
///
/// POST /api/v1/matches/run
///
/// Request body (optional):
/// ```json
/// {
///   "minOverlapMinutes": 15
/// }
/// ```
async fn run_matches(state: web::Data<AppState>, body: web::Bytes) -> impl Responder {
    let req: RunMatchesRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RunMatchesRequest::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(req) => req,
            Err(e) => {
                tracing::info!("Rejected run_matches body: {}", e);
                return HttpResponse::BadRequest().json(error_response(
                    400,
                    "invalid_json",
                    format!("Invalid JSON: {}", e),
                ));
            }
        }
    };

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for run_matches request: {:?}", errors);
        return HttpResponse::BadRequest().json(error_response(
            400,
            "validation_failed",
            errors.to_string(),
        ));
    }

    let result = match req.min_overlap_minutes {
        Some(minutes) => state.store.run_match_with(minutes).await,
        None => state.store.run_match().await,
    };

    match result {
        Ok(run) => HttpResponse::Ok().json(RunMatchesResponse {
            run_id: run.run_id,
            computed_at: run.computed_at,
            min_overlap_minutes: run.min_overlap_minutes,
            pairs_evaluated: run.pairs_evaluated,
            skipped_windows: run.skipped_windows,
            total_matches: run.matches.len(),
            matches: run.matches,
        }),
        Err(e) => {
            tracing::error!("Match run failed: {}", e);
            HttpResponse::InternalServerError().json(error_response(
                500,
                "match_run_failed",
                e.to_string(),
            ))
        }
    }
}

/// Last stored match set
///
/// GET /api/v1/matches
async fn list_matches(state: web::Data<AppState>) -> impl Responder {
    match state.store.current_matches().await {
        Ok(matches) => HttpResponse::Ok().json(ListMatchesResponse {
            total_matches: matches.len(),
            matches,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch stored matches: {}", e);
            HttpResponse::InternalServerError().json(error_response(
                500,
                "match_fetch_failed",
                e.to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Matcher;
    use crate::models::{AvailabilityWindow, Dog, DogWalker, WindowOwner};
    use crate::services::InMemoryRepository;
    use actix_web::{test, App};
    use chrono::{NaiveTime, Weekday};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn seeded_state() -> AppState {
        let dogs = vec![Dog {
            id: 1,
            name: "Rex".to_string(),
            breed: None,
            owner_id: 1,
            availabilities: vec![AvailabilityWindow {
                id: 1,
                weekday: Weekday::Mon,
                start_time: t(9, 0),
                end_time: t(9, 10),
                owner: WindowOwner::Dog(1),
            }],
        }];
        let walkers = vec![DogWalker {
            id: 1,
            name: "Ann".to_string(),
            phone: None,
            availabilities: vec![AvailabilityWindow {
                id: 2,
                weekday: Weekday::Mon,
                start_time: t(9, 5),
                end_time: t(9, 20),
                owner: WindowOwner::Walker(1),
            }],
        }];
        let repo = Arc::new(InMemoryRepository::with_data(dogs, walkers));
        AppState {
            store: Arc::new(MatchStore::new(repo, Matcher::default())),
        }
    }

    #[actix_web::test]
    async fn test_run_with_default_threshold() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(seeded_state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/v1/matches/run").to_request();
        let resp: RunMatchesResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.min_overlap_minutes, 15);
        assert_eq!(resp.pairs_evaluated, 1);
        assert_eq!(resp.total_matches, 0);
    }

    #[actix_web::test]
    async fn test_run_with_override_then_list() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(seeded_state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/matches/run")
            .set_json(serde_json::json!({ "minOverlapMinutes": 5 }))
            .to_request();
        let resp: RunMatchesResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.total_matches, 1);
        assert_eq!(resp.matches[0].start_time, t(9, 5));
        assert_eq!(resp.matches[0].end_time, t(9, 10));

        let req = test::TestRequest::get().uri("/api/v1/matches").to_request();
        let listed: ListMatchesResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.matches, resp.matches);
    }

    #[actix_web::test]
    async fn test_run_rejects_invalid_threshold() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(seeded_state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/matches/run")
            .set_json(serde_json::json!({ "minOverlapMinutes": 0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "validation_failed");
        assert_eq!(body.status_code, 400);

        let req = test::TestRequest::post()
            .uri("/api/v1/matches/run")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "invalid_json");
    }

    #[actix_web::test]
    async fn test_health_check_response() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(seeded_state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let resp: HealthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.status, "healthy");
    }
}
