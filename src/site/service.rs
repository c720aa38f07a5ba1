//! Site settings service over the app-data relays.

use crate::event::{kind, Filter};
use crate::relay::RelayPool;
use crate::signer::Signer;
use crate::site::{SiteSettings, SITE_SETTINGS_PREFIX};
use crate::types::{Config, Error, Result, SiteId};
use std::sync::Arc;
use tracing::info;

/// Reads and writes the signing user's site settings events.
#[derive(Debug, Clone)]
pub struct SiteService {
    pool: Arc<dyn RelayPool>,
    signer: Arc<dyn Signer>,
    config: Config,
}

impl SiteService {
    pub fn new(pool: Arc<dyn RelayPool>, signer: Arc<dyn Signer>, config: Config) -> Self {
        Self {
            pool,
            signer,
            config,
        }
    }

    /// Create or update a site. Settings events are replaceable, so saving
    /// twice with the same id overwrites.
    pub async fn save(&self, settings: &SiteSettings) -> Result<()> {
        crate::validation::validate_non_empty(&settings.title, "site title")?;
        crate::validation::validate_relays(&self.config.relays.app_data)?;

        let pubkey = self.signer.public_key().await?;
        let signed = self.signer.sign(settings.to_event(pubkey)).await?;

        let receipt = self
            .pool
            .publish(&self.config.relays.app_data, signed)
            .await?;
        if receipt.is_total_failure() {
            return Err(Error::relay("no relay accepted the site settings"));
        }

        info!(site = %settings.id, "site settings saved");
        Ok(())
    }

    /// Settings of one site, if published.
    pub async fn site(&self, id: &SiteId) -> Result<Option<SiteSettings>> {
        let pubkey = self.signer.public_key().await?;
        let filter = Filter::new()
            .kinds([kind::APP_DATA])
            .authors([pubkey])
            .tag("d", vec![format!("{SITE_SETTINGS_PREFIX}{id}")]);

        let event = self.pool.get(&self.config.relays.app_data, filter).await?;
        event
            .as_ref()
            .map(SiteSettings::from_event)
            .transpose()
    }

    /// All sites of the signing user.
    ///
    /// Relays cannot prefix-match `d` tags, so this lists the user's
    /// app-data events and filters client-side.
    pub async fn sites(&self) -> Result<Vec<SiteSettings>> {
        let pubkey = self.signer.public_key().await?;
        let filter = Filter::new().kinds([kind::APP_DATA]).authors([pubkey]);

        let events = self
            .pool
            .list(&self.config.relays.app_data, &[filter])
            .await?;

        Ok(events
            .iter()
            .filter(|e| {
                e.d_tag()
                    .is_some_and(|d| d.starts_with(SITE_SETTINGS_PREFIX))
            })
            .filter_map(|e| SiteSettings::from_event(e).ok())
            .collect())
    }
}
