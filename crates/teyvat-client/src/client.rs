/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! The top-level Teyvat client

use crate::cache::CachedEntity;
use crate::endpoints::{auth::AuthEndpoints, entity::EntityEndpoints, EndpointCore};
use crate::gate::{QuotaGate, QuotaState};
use crate::transport::Transport;
use serde_json::json;
use std::sync::Arc;
use teyvat_core::{Config, FlushScope, Result, CACHE_ALL_MIN_QUOTA, MAX_PAGE_SIZE};
use teyvat_models::{
  Artifact, ArtifactSet, Character, CharacterProfile, Element, LoginSession, Region, RequestOptions,
  Talent, Weapon,
};
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Character fetched to sample the quota headers on startup
const PROBE_CHARACTER: &str = "Amber";

/// Main Teyvat API client
///
/// Owns one quota gate, one request queue and one set of entity caches.
/// Separate clients (for example with different tokens) share nothing.
///
/// # Examples
///
/// ```ignore
/// use teyvat_client::TeyvatClient;
/// use teyvat_core::Config;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = TeyvatClient::connect(Config::from_env()?).await?;
///
///     let amber = client.get_character("Amber", None).await;
///     let weapons = client.get_weapons(None).await.unwrap_or_default();
///     println!("{:?} / {} weapons", amber.map(|c| c.name), weapons.len());
///
///     Ok(())
/// }
/// ```
pub struct TeyvatClient {
  config: Config,
  core: EndpointCore,
  ready: OnceCell<bool>,
}

impl TeyvatClient {
  /// Create a new client without touching the network
  ///
  /// # Errors
  ///
  /// Returns an error if the base URL is invalid or the HTTP client cannot
  /// be created.
  pub fn new(config: Config) -> Result<Self> {
    let transport = Arc::new(Transport::new(&config)?);
    let core = EndpointCore::new(transport, config.cache, config.silent);
    Ok(Self { config, core, ready: OnceCell::new() })
  }

  /// Create a client, wait until it is [`ready`](Self::ready) and, in
  /// aggressive mode, warm every cache.
  pub async fn connect(config: Config) -> Result<Self> {
    let client = Self::new(config)?;

    if client.ready().await && client.config.aggressive {
      if client.cache_all().await {
        info!("Cached all entries");
      } else {
        warn!("Failed to cache all entries");
      }
    }

    Ok(client)
  }

  /// Resolves once the initial quota has been sampled.
  ///
  /// The first call issues one ungated request and records its rate-limit
  /// headers; later calls return the same answer immediately. `false` means
  /// the probe never got a response.
  pub async fn ready(&self) -> bool {
    *self
      .ready
      .get_or_init(move || async move {
        let query = [("name", PROBE_CHARACTER.to_string())];
        match self.core.send("character", &query, &json!({}), true).await {
          Ok(response) => {
            let quota = self.quota();
            info!(status = %response.status, remaining = quota.remaining, limit = quota.limit, "Client ready");
            true
          }
          Err(err) => {
            self.core.errors.report("ready", &err);
            false
          }
        }
      })
      .await
  }

  /// Configuration the client was built with
  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Quota as last reported by the server
  pub fn quota(&self) -> QuotaState {
    self.core.gate.snapshot()
  }

  /// Shared quota gate, e.g. to wait on it before an external burst
  pub fn gate(&self) -> &QuotaGate {
    &self.core.gate
  }

  /// Endpoint group for any collection
  pub fn entities<T: CachedEntity>(&self) -> EntityEndpoints<T> {
    EntityEndpoints::new(self.core.clone())
  }

  /// Character accessors, keyed by name
  pub fn characters(&self) -> EntityEndpoints<Character> {
    self.entities()
  }

  /// Weapon accessors
  pub fn weapons(&self) -> EntityEndpoints<Weapon> {
    self.entities()
  }

  /// Region accessors
  pub fn regions(&self) -> EntityEndpoints<Region> {
    self.entities()
  }

  /// Element accessors
  pub fn elements(&self) -> EntityEndpoints<Element> {
    self.entities()
  }

  /// Talent accessors
  pub fn talents(&self) -> EntityEndpoints<Talent> {
    self.entities()
  }

  /// Character profile accessors
  pub fn character_profiles(&self) -> EntityEndpoints<CharacterProfile> {
    self.entities()
  }

  /// Artifact accessors (listing only)
  pub fn artifacts(&self) -> EntityEndpoints<Artifact> {
    self.entities()
  }

  /// Artifact set accessors (listing only)
  pub fn artifact_sets(&self) -> EntityEndpoints<ArtifactSet> {
    self.entities()
  }

  /// Login and signup
  pub fn auth(&self) -> AuthEndpoints {
    AuthEndpoints::new(self.core.clone())
  }

  /// Get a character by name.
  ///
  /// Served from the cache when no options are given and the character was
  /// fetched before, either alone or as part of a listing. Failures resolve
  /// to `None`; use [`EntityEndpoints::try_get`] for the error.
  pub async fn get_character(&self, name: &str, options: Option<RequestOptions>) -> Option<Character> {
    self.characters().get(name, options).await
  }

  /// Get every character, walking all pages.
  pub async fn get_characters(&self, options: Option<RequestOptions>) -> Option<Vec<Character>> {
    self.characters().list(options).await
  }

  /// Get a weapon by id
  pub async fn get_weapon(&self, id: &str, options: Option<RequestOptions>) -> Option<Weapon> {
    self.weapons().get(id, options).await
  }

  /// Get every weapon
  pub async fn get_weapons(&self, options: Option<RequestOptions>) -> Option<Vec<Weapon>> {
    self.weapons().list(options).await
  }

  /// Get a region by id
  pub async fn get_region(&self, id: &str, options: Option<RequestOptions>) -> Option<Region> {
    self.regions().get(id, options).await
  }

  /// Get every region
  pub async fn get_regions(&self, options: Option<RequestOptions>) -> Option<Vec<Region>> {
    self.regions().list(options).await
  }

  /// Get an element by id
  pub async fn get_element(&self, id: &str, options: Option<RequestOptions>) -> Option<Element> {
    self.elements().get(id, options).await
  }

  /// Get every element
  pub async fn get_elements(&self, options: Option<RequestOptions>) -> Option<Vec<Element>> {
    self.elements().list(options).await
  }

  /// Get a talent by id
  pub async fn get_talent(&self, id: &str, options: Option<RequestOptions>) -> Option<Talent> {
    self.talents().get(id, options).await
  }

  /// Get every talent
  pub async fn get_talents(&self, options: Option<RequestOptions>) -> Option<Vec<Talent>> {
    self.talents().list(options).await
  }

  /// Get a character profile by id
  pub async fn get_character_profile(
    &self,
    id: &str,
    options: Option<RequestOptions>,
  ) -> Option<CharacterProfile> {
    self.character_profiles().get(id, options).await
  }

  /// Get every character profile
  pub async fn get_character_profiles(
    &self,
    options: Option<RequestOptions>,
  ) -> Option<Vec<CharacterProfile>> {
    self.character_profiles().list(options).await
  }

  /// Get every artifact
  pub async fn get_artifacts(&self, options: Option<RequestOptions>) -> Option<Vec<Artifact>> {
    self.artifacts().list(options).await
  }

  /// Get every artifact set, with their pieces included by default
  pub async fn get_artifact_sets(&self, options: Option<RequestOptions>) -> Option<Vec<ArtifactSet>> {
    self.artifact_sets().list(options).await
  }

  /// Drop cached entries; [`FlushScope::All`] clears every collection.
  pub fn flush_cache(&self, scope: FlushScope) {
    self.core.cache.flush(&scope);
  }

  /// Fetch and cache every collection.
  ///
  /// Refuses to start, returning `false` without any request, when caching
  /// is disabled or fewer than six calls are known to remain. Returns `true`
  /// only if every collection was fetched.
  pub async fn cache_all(&self) -> bool {
    if !self.config.cache {
      warn!("cache_all called with caching disabled");
      return false;
    }

    let remaining = self.quota().remaining;
    if remaining < CACHE_ALL_MIN_QUOTA {
      warn!(remaining, "Not enough quota left to cache all entries");
      return false;
    }

    let options = || Some(RequestOptions::new().with_take(i64::from(MAX_PAGE_SIZE)).with_cache(true));
    let outcomes = [
      ("characters", self.characters().try_list(options()).await.map(drop)),
      ("weapons", self.weapons().try_list(options()).await.map(drop)),
      ("regions", self.regions().try_list(options()).await.map(drop)),
      ("elements", self.elements().try_list(options()).await.map(drop)),
      ("talents", self.talents().try_list(options()).await.map(drop)),
      ("characterProfiles", self.character_profiles().try_list(options()).await.map(drop)),
      ("artifacts", self.artifacts().try_list(options()).await.map(drop)),
      ("artifactSets", self.artifact_sets().try_list(options()).await.map(drop)),
    ];

    let mut complete = true;
    for (context, outcome) in outcomes {
      if let Err(err) = outcome {
        self.core.errors.report(context, &err);
        complete = false;
      }
    }
    complete
  }

  /// See [`AuthEndpoints::login`].
  pub async fn login(&self, email: &str, password: &str) -> Result<LoginSession> {
    self.auth().login(email, password).await
  }

  /// See [`AuthEndpoints::create_account`].
  pub async fn create_account(&self, email: &str, username: &str, password: &str) -> Result<()> {
    self.auth().create_account(email, username, password).await
  }
}

impl std::fmt::Debug for TeyvatClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TeyvatClient")
      .field("transport", &self.core.transport)
      .field("quota", &self.quota())
      .field("caching", &self.core.caching)
      .field("silent", &self.core.errors.is_silent())
      .finish()
  }
}
