// Route exports
pub mod activity;
pub mod interests;
pub mod matches;
pub mod saved;

use crate::models::Profile;
use crate::services::{CacheKey, SupabaseError};
use actix_web::web;
use matches::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(interests::configure)
            .configure(saved::configure)
            .configure(activity::configure),
    );
}

/// Profile lookup with a short-lived cache in front of Supabase.
/// Roles change rarely enough that TTL-bounded staleness is acceptable.
pub(crate) async fn load_profile(
    state: &web::Data<AppState>,
    user_id: &str,
) -> Result<Profile, SupabaseError> {
    let cache_key = CacheKey::profile(user_id);

    if let Ok(profile) = state.cache.get::<Profile>(&cache_key).await {
        return Ok(profile);
    }

    let profile = state.supabase.get_profile(user_id).await?;

    if let Err(e) = state.cache.set(&cache_key, &profile).await {
        tracing::warn!("Failed to cache profile {}: {}", user_id, e);
    }

    Ok(profile)
}
