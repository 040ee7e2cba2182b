//! Profile documents in Firestore.
//!
//! Each identity has one document at `{collection}/{identity id}` holding
//! string fields `name`, `email`, and `createdAt` (RFC 3339).

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use ciris_core::IdentityId;
use ciris_session::{Profile, ProfileError, ProfileStore};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::config::FirebaseConfig;
use crate::identity::IdTokenSource;

/// Profile store backed by the Firestore REST API.
pub struct FirestoreProfileStore {
    http: reqwest::Client,
    collection_url: String,
    tokens: Arc<dyn IdTokenSource>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    fields: ProfileFields,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfileFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<StringValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<StringValue>,
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    created_at: Option<StringValue>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StringValue {
    string_value: String,
}

impl StringValue {
    fn wrap(value: Option<&str>) -> Option<Self> {
        value.map(|v| Self {
            string_value: v.to_string(),
        })
    }
}

impl Document {
    fn from_profile(profile: &Profile) -> Self {
        let created_at = profile
            .created_at()
            .map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true));
        Self {
            fields: ProfileFields {
                name: StringValue::wrap(profile.display_name()),
                email: StringValue::wrap(profile.email()),
                created_at: StringValue::wrap(created_at.as_deref()),
            },
        }
    }

    fn into_profile(self) -> Profile {
        let fields = self.fields;
        let created_at = fields.created_at.and_then(|value| {
            DateTime::parse_from_rfc3339(&value.string_value)
                .map(|at| at.with_timezone(&Utc))
                .map_err(|e| debug!(value = %value.string_value, error = %e, "ignoring unparseable createdAt"))
                .ok()
        });
        Profile::from_parts(
            fields.name.map(|v| v.string_value),
            fields.email.map(|v| v.string_value),
            created_at,
        )
    }
}

impl FirestoreProfileStore {
    /// Creates a store using an existing HTTP client.
    #[must_use]
    pub fn with_http(
        http: reqwest::Client,
        config: &FirebaseConfig,
        tokens: Arc<dyn IdTokenSource>,
    ) -> Self {
        let collection_url = format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            config.firestore_base_url(),
            config.project_id(),
            config.profile_collection()
        );
        Self {
            http,
            collection_url,
            tokens,
        }
    }

    fn document_url(&self, id: &IdentityId) -> String {
        format!("{}/{}", self.collection_url, id)
    }

    /// Attaches the token held for `id`; other identities' tokens are never sent.
    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        id: &IdentityId,
    ) -> reqwest::RequestBuilder {
        match self.tokens.id_token_for(id) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn unreachable(e: impl fmt::Display) -> ProfileError {
    ProfileError::Unreachable {
        reason: e.to_string(),
    }
}

#[async_trait]
impl ProfileStore for FirestoreProfileStore {
    #[instrument(skip(self), fields(identity = %id))]
    async fn get(&self, id: &IdentityId) -> Result<Option<Profile>, ProfileError> {
        let response = self
            .authorize(self.http.get(self.document_url(id)), id)
            .send()
            .await
            .map_err(unreachable)?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let document: Document =
                    response
                        .json()
                        .await
                        .map_err(|e| ProfileError::Malformed {
                            reason: e.to_string(),
                        })?;
                Ok(Some(document.into_profile()))
            }
            status => Err(unreachable(format!("firestore returned {status}"))),
        }
    }

    #[instrument(skip(self, profile), fields(identity = %id))]
    async fn put(&self, id: &IdentityId, profile: &Profile) -> Result<(), ProfileError> {
        let response = self
            .authorize(self.http.patch(self.document_url(id)), id)
            .json(&Document::from_profile(profile))
            .send()
            .await
            .map_err(unreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(unreachable(format!("firestore returned {status}")));
        }
        debug!("profile document written");
        Ok(())
    }
}

impl fmt::Debug for FirestoreProfileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirestoreProfileStore")
            .field("collection_url", &self.collection_url)
            .finish_non_exhaustive()
    }
}
