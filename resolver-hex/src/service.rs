//! Resolution Service
//!
//! Orchestrates validation, repository-first lookups and provider fallback.
//! Contains NO infrastructure logic - pure business orchestration.

use std::time::Duration;

use chrono::Utc;

use resolver_types::{
    AppError, ConversionResult, ConversionSvc, Currency, CurrencyRepository, Entity, ProviderError,
    RatePair, RateProvider, RateRequest, RepoError, Source, checked_amount, normalize_symbol,
    parse_symbol,
};

/// Application service for conversions, currencies and rates.
///
/// Generic over the repository and provider ports; adapters are injected at
/// compile time. The service keeps no state of its own between calls.
pub struct ResolutionService<R: CurrencyRepository, P: RateProvider> {
    repo: R,
    provider: P,
    rate_ttl: Option<chrono::Duration>,
}

/// Maps `RepoError::NotFound` to a business not-found, anything else to an
/// infrastructure failure tagged with the repository call.
fn missing_as(entity: Entity, operation: &'static str) -> impl FnOnce(RepoError) -> AppError {
    move |e| match e {
        RepoError::NotFound => AppError::NotFound(entity),
        other => AppError::repo(operation, other),
    }
}

impl<R: CurrencyRepository, P: RateProvider> ResolutionService<R, P> {
    /// Creates a service that trusts stored rates until they are explicitly updated.
    pub fn new(repo: R, provider: P) -> Self {
        Self {
            repo,
            provider,
            rate_ttl: None,
        }
    }

    /// Stored rates older than `ttl` are ignored and refreshed from the provider.
    pub fn with_rate_ttl(mut self, ttl: Duration) -> Self {
        self.rate_ttl = chrono::Duration::from_std(ttl).ok();
        self
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns a reference to the underlying rate provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Conversion
    // ─────────────────────────────────────────────────────────────────────────────

    /// Converts a validated request with `from != to`.
    ///
    /// A fresh stored rate is applied locally (`Source::Repo`). Otherwise the
    /// provider is asked for a live quote (`Source::Exchange`) and the observed
    /// rate is written back together with its inverse. An amount that
    /// overflows during conversion is rejected rather than returned as a
    /// non-finite number.
    pub async fn convert(&self, svc: &ConversionSvc) -> Result<ConversionResult, AppError> {
        let stored = self
            .repo
            .read_rate_pair(&svc.from, &svc.to)
            .await
            .map_err(|e| AppError::repo("read_rate_pair", e))?;

        if let Some(pair) = stored {
            if pair.is_fresh(self.rate_ttl, Utc::now()) {
                tracing::debug!(from = %svc.from, to = %svc.to, rate = pair.rate, "Rate served from repository");
                let converted = pair.convert(svc.amount)?;
                return Ok(ConversionResult::from_service(svc, converted, Source::Repo));
            }
            tracing::debug!(from = %svc.from, to = %svc.to, "Stored rate is stale");
        }

        let quote = self
            .provider
            .exchange(&svc.from, &svc.to, svc.amount)
            .await
            .map_err(|e| AppError::provider("exchange", e))?;

        if !quote.success {
            tracing::warn!(
                provider = self.provider.name(),
                from = %svc.from,
                to = %svc.to,
                "Provider declined conversion"
            );
            return Err(AppError::provider(
                "exchange",
                ProviderError::Declined {
                    operation: "exchange",
                },
            ));
        }

        let converted = checked_amount(quote.converted_amount)?;
        self.write_through(&svc.from, &svc.to, quote.rate).await;

        Ok(ConversionResult::from_service(svc, converted, Source::Exchange))
    }

    /// Best-effort caching of a live rate. Never fails the conversion.
    async fn write_through(&self, from: &str, to: &str, rate: f64) {
        let pair = match RatePair::new(from, to, rate) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::debug!(from, to, rate, error = %e, "Quote not cacheable");
                return;
            }
        };

        // Rate pairs reference currencies; unknown symbols are only converted, not stored.
        for symbol in [from, to] {
            match self.repo.read_currency(symbol).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    tracing::debug!(symbol, "Skipping rate write-through for unknown currency");
                    return;
                }
                Err(e) => {
                    tracing::warn!(symbol, error = %e, "Rate write-through lookup failed");
                    return;
                }
            }
        }

        match self.repo.upsert_rate_pair_with_inverse(&pair).await {
            Ok(()) => tracing::debug!(from, to, rate, "Cached provider rate"),
            Err(e) => tracing::warn!(from, to, error = %e, "Rate write-through failed"),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Currency Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists stored currencies, or the provider's list when none are stored.
    pub async fn get_currencies(&self) -> Result<Vec<Currency>, AppError> {
        let count = self
            .repo
            .count_currencies()
            .await
            .map_err(|e| AppError::repo("count_currencies", e))?;

        if count > 0 {
            return self
                .repo
                .list_currencies()
                .await
                .map_err(|e| AppError::repo("list_currencies", e));
        }

        tracing::debug!(
            provider = self.provider.name(),
            "Repository empty, listing provider currencies"
        );
        let listing = self
            .provider
            .get_currencies()
            .await
            .map_err(|e| AppError::provider("get_currencies", e))?;

        if !listing.success {
            return Err(AppError::provider(
                "get_currencies",
                ProviderError::Declined {
                    operation: "get_currencies",
                },
            ));
        }

        Ok(listing
            .symbols
            .into_iter()
            .map(|(symbol, description)| {
                Currency::from_parts(normalize_symbol(&symbol), description, Source::Exchange)
            })
            .collect())
    }

    /// Adds a currency. Adding an existing symbol succeeds and leaves the
    /// stored record untouched.
    pub async fn add_currency(&self, symbol: &str, description: &str) -> Result<Currency, AppError> {
        let currency = Currency::new(symbol, description, Source::Repo)?;

        if let Some(existing) = self.read_currency(&currency.symbol).await? {
            tracing::debug!(symbol = %existing.symbol, "Currency already exists");
            return Ok(existing);
        }

        match self.repo.create_currency(&currency).await {
            Ok(()) => {
                tracing::info!(symbol = %currency.symbol, "Currency added");
                Ok(currency)
            }
            // Lost a race against a concurrent add of the same symbol.
            Err(RepoError::Conflict(_)) => Ok(self
                .read_currency(&currency.symbol)
                .await?
                .unwrap_or(currency)),
            Err(e) => Err(AppError::repo("create_currency", e)),
        }
    }

    /// Overwrites the description of an existing currency.
    pub async fn update_currency(
        &self,
        symbol: &str,
        description: &str,
    ) -> Result<Currency, AppError> {
        let symbol = parse_symbol(symbol)?;
        let currency = self
            .repo
            .update_currency(&symbol, description)
            .await
            .map_err(missing_as(Entity::Currency, "update_currency"))?;

        tracing::info!(symbol = %currency.symbol, "Currency updated");
        Ok(currency)
    }

    /// Gets a currency by symbol.
    pub async fn get_currency(&self, symbol: &str) -> Result<Currency, AppError> {
        let symbol = parse_symbol(symbol)?;
        self.read_currency(&symbol)
            .await?
            .ok_or(AppError::NotFound(Entity::Currency))
    }

    /// Removes a currency and every rate pair referencing it.
    pub async fn remove_currency(&self, symbol: &str) -> Result<(), AppError> {
        let symbol = parse_symbol(symbol)?;
        self.repo
            .delete_currency(&symbol)
            .await
            .map_err(missing_as(Entity::Currency, "delete_currency"))?;

        tracing::info!(symbol = %symbol, "Currency removed");
        Ok(())
    }

    async fn read_currency(&self, symbol: &str) -> Result<Option<Currency>, AppError> {
        self.repo
            .read_currency(symbol)
            .await
            .map_err(|e| AppError::repo("read_currency", e))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Rate Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Stores a rate and its inverse. Both currencies must already exist and
    /// the pair must not; existing pairs are changed through [`Self::update_rate`].
    pub async fn create_rate(&self, req: &RateRequest) -> Result<RatePair, AppError> {
        let pair = req.check()?;

        for symbol in [&pair.from, &pair.to] {
            if self.read_currency(symbol).await?.is_none() {
                return Err(AppError::NotFound(Entity::Currency));
            }
        }

        let existing = self
            .repo
            .read_rate_pair(&pair.from, &pair.to)
            .await
            .map_err(|e| AppError::repo("read_rate_pair", e))?;
        if existing.is_some() {
            return Err(AppError::AlreadyExists(Entity::Rate));
        }

        self.repo
            .upsert_rate_pair_with_inverse(&pair)
            .await
            .map_err(missing_as(Entity::Currency, "upsert_rate_pair_with_inverse"))?;

        tracing::info!(from = %pair.from, to = %pair.to, rate = pair.rate, "Rate created");
        Ok(pair)
    }

    /// Replaces an existing rate, recomputing its inverse.
    pub async fn update_rate(&self, req: &RateRequest) -> Result<RatePair, AppError> {
        let pair = req.check()?;

        let existing = self
            .repo
            .read_rate_pair(&pair.from, &pair.to)
            .await
            .map_err(|e| AppError::repo("read_rate_pair", e))?;
        if existing.is_none() {
            return Err(AppError::NotFound(Entity::Rate));
        }

        self.repo
            .upsert_rate_pair_with_inverse(&pair)
            .await
            .map_err(missing_as(Entity::Rate, "upsert_rate_pair_with_inverse"))?;

        tracing::info!(from = %pair.from, to = %pair.to, rate = pair.rate, "Rate updated");
        Ok(pair)
    }

    /// Removes a rate together with its inverse.
    pub async fn remove_rate(&self, from: &str, to: &str) -> Result<(), AppError> {
        let from = parse_symbol(from)?;
        let to = parse_symbol(to)?;

        self.repo
            .delete_rate_pair_with_inverse(&from, &to)
            .await
            .map_err(missing_as(Entity::Rate, "delete_rate_pair_with_inverse"))?;

        tracing::info!(from = %from, to = %to, "Rate removed");
        Ok(())
    }

    /// Lists every stored rate pair, both directions included.
    pub async fn get_rates(&self) -> Result<Vec<RatePair>, AppError> {
        self.repo
            .list_rate_pairs()
            .await
            .map_err(|e| AppError::repo("list_rate_pairs", e))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Startup
    // ─────────────────────────────────────────────────────────────────────────────

    /// Fills an empty repository with the provider's currencies.
    ///
    /// Returns the number of currencies inserted; zero when the repository
    /// already had data.
    pub async fn seed(&self) -> Result<usize, AppError> {
        let count = self
            .repo
            .count_currencies()
            .await
            .map_err(|e| AppError::repo("count_currencies", e))?;
        if count > 0 {
            tracing::debug!(count, "Repository already seeded");
            return Ok(0);
        }

        let listing = self
            .provider
            .get_currencies()
            .await
            .map_err(|e| AppError::provider("get_currencies", e))?;
        if !listing.success {
            return Err(AppError::provider(
                "get_currencies",
                ProviderError::Declined {
                    operation: "get_currencies",
                },
            ));
        }

        let mut inserted = 0;
        for (symbol, description) in listing.symbols {
            let currency = match Currency::new(&symbol, description, Source::Exchange) {
                Ok(currency) => currency,
                Err(e) => {
                    tracing::debug!(symbol = %symbol, error = %e, "Skipping provider currency");
                    continue;
                }
            };
            match self.repo.create_currency(&currency).await {
                Ok(()) => inserted += 1,
                Err(RepoError::Conflict(_)) => {}
                Err(e) => return Err(AppError::repo("create_currency", e)),
            }
        }

        tracing::info!(
            provider = self.provider.name(),
            inserted,
            "Seeded currencies from provider"
        );
        Ok(inserted)
    }
}
