use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;

use crate::models::{AccountUser, SavedTrip, UserProfile};

/// Auth and saved-trip storage for signed-in travellers.
#[async_trait]
pub trait AccountBackend: Send + Sync {
    /// Resolves the user behind an access token; `None` if the token is not
    /// accepted.
    async fn get_user(&self, access_token: &str) -> anyhow::Result<Option<AccountUser>>;

    /// URL to send the browser to for OAuth sign-in with `provider`.
    fn sign_in_url(&self, provider: &str, redirect_to: Option<&str>) -> anyhow::Result<String>;

    async fn sign_out(&self, access_token: &str) -> anyhow::Result<()>;

    /// Newest booking first.
    async fn list_trips(&self, access_token: &str, user_id: &str) -> anyhow::Result<Vec<SavedTrip>>;

    async fn save_trip(&self, access_token: &str, trip: &SavedTrip) -> anyhow::Result<SavedTrip>;

    async fn get_profile(
        &self,
        access_token: &str,
        user_id: &str,
    ) -> anyhow::Result<Option<UserProfile>>;

    async fn upsert_profile(&self, access_token: &str, profile: &UserProfile) -> anyhow::Result<()>;
}

pub struct SupabaseClient {
    url: String,
    anon_key: String,
    client: reqwest::Client,
}

impl SupabaseClient {
    pub fn new(url: String, anon_key: String) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key,
            client: reqwest::Client::new(),
        }
    }

    fn get(&self, path: &str, access_token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{path}", self.url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
    }

    fn post(&self, path: &str, access_token: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{path}", self.url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
    }
}

#[async_trait]
impl AccountBackend for SupabaseClient {
    async fn get_user(&self, access_token: &str) -> anyhow::Result<Option<AccountUser>> {
        let resp = self
            .get("/auth/v1/user", access_token)
            .send()
            .await
            .context("failed to call Supabase auth")?;

        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => {
                let user = resp
                    .json()
                    .await
                    .context("failed to parse Supabase user")?;
                Ok(Some(user))
            }
            status => anyhow::bail!("Supabase auth error ({status})"),
        }
    }

    fn sign_in_url(&self, provider: &str, redirect_to: Option<&str>) -> anyhow::Result<String> {
        anyhow::ensure!(
            !provider.is_empty() && provider.chars().all(|c| c.is_ascii_alphanumeric()),
            "invalid OAuth provider: {provider}"
        );

        let mut params = vec![("provider", provider.to_lowercase())];
        if let Some(redirect) = redirect_to {
            params.push(("redirect_to", redirect.to_string()));
        }
        let url = reqwest::Url::parse_with_params(&format!("{}/auth/v1/authorize", self.url), &params)
            .context("invalid Supabase URL")?;
        Ok(url.to_string())
    }

    async fn sign_out(&self, access_token: &str) -> anyhow::Result<()> {
        self.post("/auth/v1/logout", access_token)
            .send()
            .await
            .context("failed to call Supabase logout")?
            .error_for_status()
            .context("Supabase logout returned error")?;
        Ok(())
    }

    async fn list_trips(&self, access_token: &str, user_id: &str) -> anyhow::Result<Vec<SavedTrip>> {
        let trips = self
            .get("/rest/v1/booked_trips", access_token)
            .query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{user_id}")),
                ("order", "booking_date.desc".to_string()),
            ])
            .send()
            .await
            .context("failed to fetch trips")?
            .error_for_status()
            .context("Supabase returned error for trips")?
            .json()
            .await
            .context("failed to parse trips")?;
        Ok(trips)
    }

    async fn save_trip(&self, access_token: &str, trip: &SavedTrip) -> anyhow::Result<SavedTrip> {
        let mut saved: Vec<SavedTrip> = self
            .post("/rest/v1/booked_trips", access_token)
            .header("Prefer", "return=representation")
            .json(&[trip])
            .send()
            .await
            .context("failed to save trip")?
            .error_for_status()
            .context("Supabase returned error saving trip")?
            .json()
            .await
            .context("failed to parse saved trip")?;
        saved
            .pop()
            .ok_or_else(|| anyhow::anyhow!("Supabase returned no saved trip"))
    }

    async fn get_profile(
        &self,
        access_token: &str,
        user_id: &str,
    ) -> anyhow::Result<Option<UserProfile>> {
        let mut rows: Vec<UserProfile> = self
            .get("/rest/v1/user_profiles", access_token)
            .query(&[("select", "*".to_string()), ("id", format!("eq.{user_id}"))])
            .send()
            .await
            .context("failed to fetch profile")?
            .error_for_status()
            .context("Supabase returned error for profile")?
            .json()
            .await
            .context("failed to parse profile")?;
        Ok(rows.pop())
    }

    async fn upsert_profile(&self, access_token: &str, profile: &UserProfile) -> anyhow::Result<()> {
        self.post("/rest/v1/user_profiles", access_token)
            .header("Prefer", "resolution=merge-duplicates")
            .json(profile)
            .send()
            .await
            .context("failed to upsert profile")?
            .error_for_status()
            .context("Supabase returned error upserting profile")?;
        Ok(())
    }
}
