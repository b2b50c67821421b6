use crate::core::{format_activity_message, time_ago};
use crate::models::{
    ActivityEntry, ActivityItem, ActivityQuery, ActivityResponse, ErrorResponse,
    RecordActivityRequest, UserRole,
};
use crate::routes::load_profile;
use crate::routes::matches::AppState;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

const MAX_FEED_LIMIT: u16 = 100;

/// Configure activity feed routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/activity", web::get().to(get_activity))
        .route("/activity", web::post().to(record_activity));
}

/// Role-scoped activity feed
///
/// GET /api/v1/activity?userId={id}&limit=20&offset=0
///
/// Investors see their own actions plus accept/decline updates on offerings
/// they hold interests in; founders additionally see entries recorded
/// against their offerings; admins see everything.
async fn get_activity(
    state: web::Data<AppState>,
    query: web::Query<ActivityQuery>,
) -> impl Responder {
    if query.user_id.trim().is_empty() {
        return HttpResponse::Unauthorized().json(ErrorResponse {
            error: "Unauthorized".to_string(),
            message: "No user identity attached to the request".to_string(),
            status_code: 401,
        });
    }

    let user_id = &query.user_id;
    let limit = query.limit.min(MAX_FEED_LIMIT) as i64;
    let offset = query.offset as i64;

    let profile = match load_profile(&state, user_id).await {
        Ok(profile) => profile,
        Err(crate::services::SupabaseError::NotFound(_)) => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Unauthorized".to_string(),
                message: "Unknown user identity".to_string(),
                status_code: 401,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let entries = match profile.role {
        UserRole::Investor => state
            .postgres
            .get_activity_for_investor(user_id, limit, offset)
            .await,
        UserRole::Founder => {
            let offering_ids = match state.supabase.get_founder_offering_ids(user_id).await {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::error!("Failed to fetch founder offerings for {}: {}", user_id, e);
                    return HttpResponse::InternalServerError().json(ErrorResponse {
                        error: "Failed to fetch offerings".to_string(),
                        message: e.to_string(),
                        status_code: 500,
                    });
                }
            };
            state
                .postgres
                .get_activity_for_founder(user_id, &offering_ids, limit, offset)
                .await
        }
        UserRole::Admin => state.postgres.get_activity_all(limit, offset).await,
    };

    let entries = match entries {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Failed to fetch activity for {}: {}", user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch activity".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let now = chrono::Utc::now();
    let data: Vec<ActivityItem> = entries.into_iter().map(|e| format_entry(e, now)).collect();

    let response = ActivityResponse {
        count: data.len(),
        has_more: data.len() as i64 >= limit,
        data,
    };

    HttpResponse::Ok().json(response)
}

fn format_entry(entry: ActivityEntry, now: chrono::DateTime<chrono::Utc>) -> ActivityItem {
    let actor = entry
        .metadata
        .get("actor_name")
        .and_then(|v| v.as_str())
        .unwrap_or("Someone")
        .to_string();

    ActivityItem {
        formatted_message: format_activity_message(&entry.action, &actor),
        time_ago: time_ago(entry.created_at, now),
        entry,
    }
}

/// Log a new activity entry (internal use by the web tier)
///
/// POST /api/v1/activity
async fn record_activity(
    state: web::Data<AppState>,
    req: web::Json<RecordActivityRequest>,
) -> impl Responder {
    if req.user_id.trim().is_empty() {
        return HttpResponse::Unauthorized().json(ErrorResponse {
            error: "Unauthorized".to_string(),
            message: "No user identity attached to the request".to_string(),
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

    let metadata = req
        .metadata
        .clone()
        .unwrap_or_else(|| serde_json::json!({}));

    match state
        .postgres
        .record_activity(
            Some(&req.user_id),
            &req.action,
            req.entity_type.as_deref(),
            req.entity_id.as_deref(),
            metadata,
        )
        .await
    {
        Ok(id) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "id": id.to_string(),
        })),
        Err(e) => {
            tracing::error!("Failed to record activity: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to record activity".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
