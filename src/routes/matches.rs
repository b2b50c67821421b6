use crate::core::Matcher;
use crate::models::{
    ErrorResponse, FindMatchesRequest, HealthResponse, MatchResponse, Offering, SearchQuery,
};
use crate::services::{CacheKey, CacheManager, PostgresClient, SupabaseClient};
use actix_web::{web, HttpResponse, Responder};
use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub supabase: Arc<SupabaseClient>,
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<CacheManager>,
    pub matcher: Matcher,
    pub default_limit: usize,
    pub max_limit: usize,
}

/// Configure match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/match/find", web::post().to(find_matches))
        .route("/offerings/search", web::get().to(search_offerings));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find offering matches endpoint
///
/// POST /api/v1/match/find
///
/// Request body:
/// ```json
/// {
///   "investorId": "string",
///   "limit": 20,
///   "excludeOfferingIds": ["string"]
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    // Identity comes from the authenticated web tier; a blank id means no
    // identity was attached at all.
    if req.investor_id.trim().is_empty() {
        return HttpResponse::Unauthorized().json(ErrorResponse {
            error: "Unauthorized".to_string(),
            message: "No investor identity attached to the request".to_string(),
            status_code: 401,
        });
    }

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let investor_id = &req.investor_id;
    let limit = (req.limit.map(usize::from).unwrap_or(state.default_limit)).min(state.max_limit);

    tracing::info!("Finding matches for investor: {}, limit: {}", investor_id, limit);

    // Prior interests are the hard exclusion set, read fresh on every
    // request: a stale exclusion would resurface an offering the investor
    // already engaged with. A read failure fails the whole request; it
    // must not degrade to an empty exclusion set.
    let mut excluded: HashSet<String> =
        match state.postgres.get_interested_offerings(investor_id).await {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                tracing::error!("Failed to fetch interests for {}: {}", investor_id, e);
                return HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to fetch interests".to_string(),
                    message: e.to_string(),
                    status_code: 500,
                });
            }
        };

    excluded.extend(req.exclude_offering_ids.iter().cloned());

    tracing::debug!("Excluding {} offerings for {}", excluded.len(), investor_id);

    // A missing preference record is the "no preferences" state, not an
    // error. Only transport/API failures abort here.
    let profile = match state.supabase.get_investor_profile(investor_id).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Failed to fetch investor profile for {}: {}", investor_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch investor profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let candidates = match load_candidates(&state).await {
        Ok(candidates) => candidates,
        Err(response) => return response,
    };

    tracing::debug!("Scoring {} candidates for {}", candidates.len(), investor_id);

    // Freeze the clock once so recency scoring is consistent across the
    // whole response.
    let now = chrono::Utc::now();
    let outcome = state
        .matcher
        .rank_offerings(profile.as_ref(), &excluded, candidates, now, limit);

    let has_preferences = profile.as_ref().map(|p| p.has_preferences()).unwrap_or(false);

    let response = MatchResponse {
        total: outcome.matches.len(),
        data: outcome.matches,
        has_preferences,
    };

    tracing::info!(
        "Returning {} matches for investor {} (from {} candidates)",
        response.total,
        investor_id,
        outcome.total_candidates
    );

    HttpResponse::Ok().json(response)
}

/// Load the live candidate set, enriched with interest counts.
///
/// The enriched set is shared by every investor and cached briefly; the
/// interests route invalidates it whenever a count changes.
async fn load_candidates(state: &web::Data<AppState>) -> Result<Vec<Offering>, HttpResponse> {
    let cache_key = CacheKey::live_offerings();

    match state.cache.get::<Vec<Offering>>(&cache_key).await {
        Ok(cached) => return Ok(cached),
        Err(crate::services::CacheError::CacheMiss(_)) => {}
        Err(e) => tracing::warn!("Cache read failed, falling through: {}", e),
    }

    let mut offerings = match state.supabase.get_live_offerings().await {
        Ok(offerings) => offerings,
        Err(e) => {
            tracing::error!("Failed to fetch live offerings: {}", e);
            return Err(HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch offerings".to_string(),
                message: e.to_string(),
                status_code: 500,
            }));
        }
    };

    let offering_ids: Vec<String> = offerings.iter().map(|o| o.id.clone()).collect();
    let counts = match state.postgres.get_interest_counts(&offering_ids).await {
        Ok(counts) => counts,
        Err(e) => {
            tracing::error!("Failed to fetch interest counts: {}", e);
            return Err(HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch interest counts".to_string(),
                message: e.to_string(),
                status_code: 500,
            }));
        }
    };

    for offering in &mut offerings {
        offering.interest_count = counts.get(&offering.id).copied().unwrap_or(0);
    }

    if let Err(e) = state.cache.set(&cache_key, &offerings).await {
        tracing::warn!("Failed to cache candidate set: {}", e);
    }

    Ok(offerings)
}

/// Live-offering search endpoint
///
/// GET /api/v1/offerings/search?q=term&limit=20
async fn search_offerings(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> impl Responder {
    let q = query.q.trim();
    if q.is_empty() {
        return HttpResponse::Ok().json(serde_json::json!({
            "data": [],
            "total": 0,
        }));
    }

    let limit = (query.limit as usize).min(state.max_limit);

    match state.supabase.search_offerings(q, limit).await {
        Ok(offerings) => HttpResponse::Ok().json(serde_json::json!({
            "total": offerings.len(),
            "data": offerings,
        })),
        Err(e) => {
            tracing::error!("Offering search failed for {:?}: {}", q, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Search failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
