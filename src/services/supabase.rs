use crate::models::{InvestorProfile, Offering, Profile};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Supabase
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid service key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table names in the Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseTables {
    pub profiles: String,
    pub investor_profiles: String,
    pub companies: String,
    pub offerings: String,
}

/// Supabase REST (PostgREST) client.
///
/// Handles all reads from the marketplace database:
/// - User and investor profiles
/// - Live offerings with their company embed
/// - Founder company/offering lookups for the activity feed
pub struct SupabaseClient {
    base_url: String,
    service_key: String,
    client: Client,
    tables: SupabaseTables,
}

/// Column list requested for offering rows; `company` is a PostgREST
/// embedded resource resolved through the offerings->companies FK.
const OFFERING_SELECT: &str = "*,company:companies(id,name,sector,stage)";

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(base_url: String, service_key: String, tables: SupabaseTables) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            service_key,
            client,
            tables,
        }
    }

    fn rest_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            table
        )
    }

    /// Issue a GET against a PostgREST endpoint and return the row array
    async fn fetch_rows(&self, url: &str) -> Result<Vec<Value>, SupabaseError> {
        tracing::debug!("Supabase GET {}", url);

        let response = self
            .client
            .get(url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SupabaseError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            return Err(SupabaseError::ApiError(format!("{} - {}", status, body)));
        }

        let json: Value = response.json().await?;
        json.as_array()
            .cloned()
            .ok_or_else(|| SupabaseError::InvalidResponse("Expected an array of rows".into()))
    }

    /// Fetch a marketplace profile (name + role) by user id
    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, SupabaseError> {
        let url = format!(
            "{}?id=eq.{}&select=id,full_name,role",
            self.rest_url(&self.tables.profiles),
            urlencoding::encode(user_id)
        );

        let rows = self.fetch_rows(&url).await?;
        let row = rows
            .first()
            .ok_or_else(|| SupabaseError::NotFound(format!("Profile not found for user {}", user_id)))?;

        serde_json::from_value(row.clone())
            .map_err(|e| SupabaseError::InvalidResponse(format!("Failed to parse profile: {}", e)))
    }

    /// Fetch an investor's preference record.
    ///
    /// Returns `Ok(None)` when no record exists; that is the "no stated
    /// preferences" state, distinct from a transport or API error.
    pub async fn get_investor_profile(
        &self,
        user_id: &str,
    ) -> Result<Option<InvestorProfile>, SupabaseError> {
        let url = format!(
            "{}?user_id=eq.{}&select=*",
            self.rest_url(&self.tables.investor_profiles),
            urlencoding::encode(user_id)
        );

        let rows = self.fetch_rows(&url).await?;
        match rows.first() {
            Some(row) => serde_json::from_value(row.clone()).map(Some).map_err(|e| {
                SupabaseError::InvalidResponse(format!("Failed to parse investor profile: {}", e))
            }),
            None => Ok(None),
        }
    }

    /// Fetch every offering currently in `live` status, with its company embed
    pub async fn get_live_offerings(&self) -> Result<Vec<Offering>, SupabaseError> {
        let url = format!(
            "{}?status=eq.live&select={}",
            self.rest_url(&self.tables.offerings),
            urlencoding::encode(OFFERING_SELECT)
        );

        let rows = self.fetch_rows(&url).await?;
        let total = rows.len();

        let offerings: Vec<Offering> = rows
            .into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect();

        tracing::debug!("Fetched {} live offerings (rows: {})", offerings.len(), total);

        Ok(offerings)
    }

    /// Fetch a single offering by id
    pub async fn get_offering(&self, offering_id: &str) -> Result<Offering, SupabaseError> {
        let url = format!(
            "{}?id=eq.{}&select={}",
            self.rest_url(&self.tables.offerings),
            urlencoding::encode(offering_id),
            urlencoding::encode(OFFERING_SELECT)
        );

        let rows = self.fetch_rows(&url).await?;
        let row = rows.first().ok_or_else(|| {
            SupabaseError::NotFound(format!("Offering not found: {}", offering_id))
        })?;

        serde_json::from_value(row.clone())
            .map_err(|e| SupabaseError::InvalidResponse(format!("Failed to parse offering: {}", e)))
    }

    /// Fetch offering snapshots for a set of ids (watchlist hydration)
    pub async fn get_offerings_by_ids(
        &self,
        offering_ids: &[String],
    ) -> Result<Vec<Offering>, SupabaseError> {
        if offering_ids.is_empty() {
            return Ok(vec![]);
        }

        let id_list = offering_ids.join(",");
        let url = format!(
            "{}?id=in.({})&select={}",
            self.rest_url(&self.tables.offerings),
            urlencoding::encode(&id_list),
            urlencoding::encode(OFFERING_SELECT)
        );

        let rows = self.fetch_rows(&url).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect())
    }

    /// Offering ids belonging to a founder's company, for activity scoping
    pub async fn get_founder_offering_ids(
        &self,
        founder_id: &str,
    ) -> Result<Vec<String>, SupabaseError> {
        let companies_url = format!(
            "{}?founder_id=eq.{}&select=id",
            self.rest_url(&self.tables.companies),
            urlencoding::encode(founder_id)
        );

        let company_rows = self.fetch_rows(&companies_url).await?;
        let company_ids: Vec<String> = company_rows
            .iter()
            .filter_map(|row| row.get("id").and_then(|v| v.as_str()).map(String::from))
            .collect();

        if company_ids.is_empty() {
            return Ok(vec![]);
        }

        let offerings_url = format!(
            "{}?company_id=in.({})&select=id",
            self.rest_url(&self.tables.offerings),
            urlencoding::encode(&company_ids.join(","))
        );

        let offering_rows = self.fetch_rows(&offerings_url).await?;
        Ok(offering_rows
            .iter()
            .filter_map(|row| row.get("id").and_then(|v| v.as_str()).map(String::from))
            .collect())
    }

    /// Title/description substring search over live offerings
    pub async fn search_offerings(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Offering>, SupabaseError> {
        let pattern = format!("*{}*", query);
        let or_filter = format!("(title.ilike.{},description.ilike.{})", pattern, pattern);
        let url = format!(
            "{}?status=eq.live&or={}&select={}&order=created_at.desc&limit={}",
            self.rest_url(&self.tables.offerings),
            urlencoding::encode(&or_filter),
            urlencoding::encode(OFFERING_SELECT),
            limit
        );

        let rows = self.fetch_rows(&url).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let tables = SupabaseTables {
            profiles: "profiles".to_string(),
            investor_profiles: "investor_profiles".to_string(),
            companies: "companies".to_string(),
            offerings: "offerings".to_string(),
        };

        let client = SupabaseClient::new(
            "https://project.supabase.co/".to_string(),
            "service_key".to_string(),
            tables,
        );

        assert_eq!(
            client.rest_url("offerings"),
            "https://project.supabase.co/rest/v1/offerings"
        );
    }
}
