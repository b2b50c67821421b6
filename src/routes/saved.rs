use crate::models::{ErrorResponse, SaveOfferingRequest};
use crate::routes::matches::AppState;
use crate::services::PostgresError;
use actix_web::{web, HttpResponse, Responder};
use std::collections::HashMap;
use validator::Validate;

/// Configure watchlist routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/saved", web::post().to(save_offering))
        .route("/saved", web::delete().to(unsave_offering))
        .route("/saved", web::get().to(list_saved));
}

/// Save an offering to the watchlist
///
/// POST /api/v1/saved
async fn save_offering(
    state: web::Data<AppState>,
    req: web::Json<SaveOfferingRequest>,
) -> impl Responder {
    if req.investor_id.trim().is_empty() {
        return HttpResponse::Unauthorized().json(ErrorResponse {
            error: "Unauthorized".to_string(),
            message: "No investor identity attached to the request".to_string(),
            status_code: 401,
        });
    }

    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state
        .postgres
        .save_offering(&req.investor_id, &req.offering_id)
        .await
    {
        Ok(()) => HttpResponse::Created().json(serde_json::json!({ "success": true })),
        Err(PostgresError::AlreadyExists(_)) => HttpResponse::Conflict().json(ErrorResponse {
            error: "Already saved".to_string(),
            message: format!("Offering {} is already on the watchlist", req.offering_id),
            status_code: 409,
        }),
        Err(e) => {
            tracing::error!("Failed to save offering: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to save offering".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Remove an offering from the watchlist
///
/// DELETE /api/v1/saved?investorId={id}&offeringId={id}
async fn unsave_offering(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let (investor_id, offering_id) = match (query.get("investorId"), query.get("offeringId")) {
        (Some(investor), Some(offering)) => (investor, offering),
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Missing parameters".to_string(),
                message: "investorId and offeringId query parameters are required".to_string(),
                status_code: 400,
            });
        }
    };

    match state.postgres.unsave_offering(investor_id, offering_id).await {
        Ok(removed) => HttpResponse::Ok().json(serde_json::json!({ "success": removed })),
        Err(e) => {
            tracing::error!("Failed to unsave offering: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to unsave offering".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// List the watchlist, hydrated with offering snapshots
///
/// GET /api/v1/saved?investorId={id}
async fn list_saved(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let investor_id = match query.get("investorId") {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Missing investorId parameter".to_string(),
                message: "investorId query parameter is required".to_string(),
                status_code: 400,
            });
        }
    };

    let saved = match state.postgres.get_saved_offerings(investor_id).await {
        Ok(saved) => saved,
        Err(e) => {
            tracing::error!("Failed to fetch watchlist for {}: {}", investor_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch watchlist".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let offering_ids: Vec<String> = saved.iter().map(|s| s.offering_id.clone()).collect();
    let offerings = match state.supabase.get_offerings_by_ids(&offering_ids).await {
        Ok(offerings) => offerings,
        Err(e) => {
            tracing::error!("Failed to hydrate watchlist for {}: {}", investor_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch offerings".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    // Saved entries whose offering has since disappeared hydrate to null
    let data: Vec<serde_json::Value> = saved
        .iter()
        .map(|entry| {
            let offering = offerings.iter().find(|o| o.id == entry.offering_id);
            serde_json::json!({
                "investor_id": entry.investor_id,
                "offering_id": entry.offering_id,
                "created_at": entry.created_at,
                "offering": offering,
            })
        })
        .collect();

    HttpResponse::Ok().json(serde_json::json!({
        "total": data.len(),
        "data": data,
    }))
}
