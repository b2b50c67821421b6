use crate::models::{
    ErrorResponse, OfferingStatus, RecordInterestRequest, RecordInterestResponse, UserRole,
};
use crate::routes::load_profile;
use crate::routes::matches::AppState;
use crate::services::{CacheKey, PostgresError, SupabaseError};
use actix_web::{web, HttpResponse, Responder};
use std::collections::HashMap;
use validator::Validate;

/// Configure interest-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/interests", web::post().to(record_interest))
        .route("/interests", web::get().to(list_interests))
        .route("/interests", web::delete().to(withdraw_interest))
        .route("/interests/stats", web::get().to(interest_stats))
        .route("/interests/offering", web::get().to(offering_interests));
}

/// Express interest in an offering
///
/// POST /api/v1/interests
///
/// Request body:
/// ```json
/// {
///   "investorId": "string",
///   "offeringId": "string",
///   "amount": 2500000,
///   "message": "string"
/// }
/// ```
async fn record_interest(
    state: web::Data<AppState>,
    req: web::Json<RecordInterestRequest>,
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

    // Only investors can express interest
    let profile = match load_profile(&state, &req.investor_id).await {
        Ok(profile) => profile,
        Err(SupabaseError::NotFound(_)) => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Unauthorized".to_string(),
                message: "Unknown investor identity".to_string(),
                status_code: 401,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", req.investor_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    if profile.role != UserRole::Investor {
        return HttpResponse::Forbidden().json(ErrorResponse {
            error: "Forbidden".to_string(),
            message: "Only investors can express interest".to_string(),
            status_code: 403,
        });
    }

    // The offering must exist and still be live
    let offering = match state.supabase.get_offering(&req.offering_id).await {
        Ok(offering) => offering,
        Err(SupabaseError::NotFound(_)) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Offering not available".to_string(),
                message: format!("Offering {} not found", req.offering_id),
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch offering {}: {}", req.offering_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch offering".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    if offering.status != OfferingStatus::Live {
        return HttpResponse::NotFound().json(ErrorResponse {
            error: "Offering not available".to_string(),
            message: "Offering is not accepting interest".to_string(),
            status_code: 404,
        });
    }

    if let Some(amount) = req.amount {
        if amount < offering.minimum_investment {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Amount below minimum".to_string(),
                message: format!("Minimum investment is {}", offering.minimum_investment),
                status_code: 400,
            });
        }
    }

    // The interest row is the critical write; everything after it is
    // best-effort.
    let interest_id = match state
        .postgres
        .record_interest(
            &req.investor_id,
            &req.offering_id,
            req.amount,
            req.message.as_deref(),
        )
        .await
    {
        Ok(id) => id,
        Err(PostgresError::AlreadyExists(_)) => {
            return HttpResponse::Conflict().json(ErrorResponse {
                error: "Already expressed interest".to_string(),
                message: format!("Interest already recorded for {}", req.offering_id),
                status_code: 409,
            });
        }
        Err(e) => {
            tracing::error!("Failed to record interest: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to record interest".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let metadata = serde_json::json!({
        "amount": req.amount,
        "actor_name": profile.full_name,
    });
    if let Err(e) = state
        .postgres
        .record_activity(
            Some(&req.investor_id),
            "interest_submitted",
            Some("offering"),
            Some(&req.offering_id),
            metadata,
        )
        .await
    {
        tracing::warn!("Interest recorded but activity log write failed: {}", e);
    }

    // Interest counts feed the social-proof tier; drop the cached
    // candidate set so the next match request sees the new count.
    if let Err(e) = state.cache.delete(&CacheKey::live_offerings()).await {
        tracing::warn!("Failed to invalidate candidate cache: {}", e);
    }

    tracing::debug!(
        "Recorded interest: {} -> {} ({:?})",
        req.investor_id,
        req.offering_id,
        req.amount
    );

    HttpResponse::Created().json(RecordInterestResponse {
        success: true,
        interest_id: interest_id.to_string(),
    })
}

/// List the offering ids an investor has engaged with
///
/// GET /api/v1/interests?investorId={id}
///
/// Returns the exclusion set the matcher applies, for client-side
/// synchronization and debugging purposes.
async fn list_interests(
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

    match state.postgres.get_interested_offerings(investor_id).await {
        Ok(offering_ids) => HttpResponse::Ok().json(serde_json::json!({
            "investorId": investor_id,
            "count": offering_ids.len(),
            "offeringIds": offering_ids,
        })),
        Err(e) => {
            tracing::error!("Failed to fetch interests for {}: {}", investor_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch interests".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Withdraw an interest
///
/// DELETE /api/v1/interests?investorId={id}&offeringId={id}
///
/// The row is kept in `withdrawn` status; the offering stays excluded from
/// the investor's matches.
async fn withdraw_interest(
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

    match state.postgres.withdraw_interest(investor_id, offering_id).await {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Interest not found".to_string(),
            message: format!("No active interest on {}", offering_id),
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to withdraw interest: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to withdraw interest".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// List interests recorded against one offering (founder's view of demand)
///
/// GET /api/v1/interests/offering?offeringId={id}
async fn offering_interests(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let offering_id = match query.get("offeringId") {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Missing offeringId parameter".to_string(),
                message: "offeringId query parameter is required".to_string(),
                status_code: 400,
            });
        }
    };

    match state.postgres.get_interests_for_offering(offering_id).await {
        Ok(interests) => HttpResponse::Ok().json(serde_json::json!({
            "total": interests.len(),
            "data": interests,
        })),
        Err(e) => {
            tracing::error!("Failed to fetch interests for offering {}: {}", offering_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch interests".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Per-status interest counts for an investor
///
/// GET /api/v1/interests/stats?investorId={id}
async fn interest_stats(
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

    match state.postgres.get_interest_stats(investor_id).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => {
            tracing::error!("Failed to fetch interest stats for {}: {}", investor_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch interest stats".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
