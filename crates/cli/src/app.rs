//! Pipeline wiring: configuration in, stored records and reports out.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use citycmp_client::{
    FetchConfig, FetchGateway, HttpTransport, Transport, YelpSource, city_names_lowercase, collect_events,
    load_state_cities, parse_city_input,
};
use citycmp_core::{AppConfig, CacheStore, CityRecord, CompareDb, Error, Metric};

use crate::report::Report;

/// Counts from one collection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectSummary {
    pub locations: usize,
    pub events: usize,
    pub restaurants: usize,
}

/// One run's worth of state: the gateway, the database and the city list.
pub struct App<T: Transport> {
    config: AppConfig,
    gateway: FetchGateway<T>,
    db: CompareDb,
    cities: Vec<CityRecord>,
    known: BTreeSet<String>,
}

impl App<HttpTransport> {
    /// Open the cache, database and city list named by `config`.
    pub async fn open(config: AppConfig) -> Result<Self> {
        let transport = HttpTransport::new(FetchConfig {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
            ..Default::default()
        })?;
        let db = CompareDb::open(&config.db_path)
            .await
            .with_context(|| format!("opening database {}", config.db_path.display()))?;
        let cities = load_state_cities(&config.cities_csv, &config.state)?;

        Ok(Self::with_parts(config, transport, db, cities))
    }
}

impl<T: Transport> App<T> {
    pub fn with_parts(config: AppConfig, transport: T, db: CompareDb, cities: Vec<CityRecord>) -> Self {
        let gateway = FetchGateway::open(transport, CacheStore::new(&config.cache_path), &config.yelp_api_url)
            .with_politeness_delay(config.politeness_delay());
        let db = db.with_state(&config.state);
        let known = city_names_lowercase(&cities);

        tracing::debug!(cached = gateway.len(), cities = cities.len(), state = %config.state, "app ready");
        Self { config, gateway, db, cities, known }
    }

    pub fn state(&self) -> &str {
        &self.config.state
    }

    pub fn reference_city(&self) -> &str {
        &self.config.reference_city
    }

    /// Lowercased names of every city in the configured state.
    pub fn known_cities(&self) -> impl Iterator<Item = &str> {
        self.known.iter().map(String::as_str)
    }

    /// Normalize `input` and check it names a city of the configured state.
    pub fn resolve_city(&self, input: &str) -> Result<String, Error> {
        let city = parse_city_input(input)?;
        if !self.known.contains(&city) {
            return Err(Error::InvalidCity(format!("{} is not a city in {}", input.trim(), self.config.state)));
        }
        Ok(city)
    }

    /// Rebuild the database from the city list, the event listing and the
    /// reference city's restaurants.
    pub async fn collect(&mut self, today: NaiveDate) -> Result<CollectSummary> {
        self.db.reset().await?;
        let locations = self.db.store_locations(&self.cities).await?;
        tracing::info!(locations, "stored city list");

        let events =
            collect_events(&mut self.gateway, &self.config.events_url, self.config.event_page_count, today).await?;
        let events = self.db.store_events(&events).await?;
        tracing::info!(events, "stored events");

        let reference = self.config.reference_city.clone();
        let restaurants = self.store_restaurants(&reference).await?;

        Ok(CollectSummary { locations, events, restaurants })
    }

    /// Fetch and store the restaurants of `city`, returning how many were new.
    pub async fn store_restaurants(&mut self, city: &str) -> Result<usize> {
        let yelp = YelpSource::from_config(&self.config)?;
        let businesses = yelp.fetch_businesses(&mut self.gateway, city).await?;
        let stored = self.db.store_restaurants(&businesses, city).await?;
        tracing::info!(city, fetched = businesses.len(), stored, "stored restaurants");
        Ok(stored)
    }

    /// Report on the reference city alone.
    pub async fn summary(&self) -> Result<Report> {
        Ok(Report::build(&self.db, &[self.reference_city()]).await?)
    }

    /// Fetch `input`'s restaurants and report it against the reference city.
    pub async fn compare(&mut self, input: &str) -> Result<Report> {
        let city = self.resolve_city(input)?;
        self.store_restaurants(&city).await?;

        let report = Report::build(&self.db, &[self.reference_city(), &city]).await?;
        let reference_has_data = report
            .row(Metric::RestaurantCount)
            .and_then(|row| row.values.first())
            .and_then(|agg| agg.value)
            .is_some_and(|count| count > 0.0);
        if !reference_has_data {
            tracing::warn!(
                reference = self.reference_city(),
                "no restaurants stored for the reference city, run `collect` first"
            );
        }

        Ok(report)
    }

    /// Log the run's cache counters.
    pub fn finish(&self) {
        let stats = self.gateway.stats();
        tracing::info!(hits = stats.hits, misses = stats.misses, entries = self.gateway.len(), "cache usage");
    }
}
