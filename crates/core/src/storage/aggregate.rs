//! Aggregate queries backing the city comparison report.

use super::connection::CompareDb;
use super::normalize_city_name;
use crate::Error;
use tokio_rusqlite::params;

/// A per-city figure the report compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    RestaurantCount,
    AverageRating,
    AverageReviewCount,
    EventCount,
}

impl Metric {
    pub const ALL: [Metric; 4] =
        [Metric::RestaurantCount, Metric::AverageRating, Metric::AverageReviewCount, Metric::EventCount];

    pub fn label(self) -> &'static str {
        match self {
            Metric::RestaurantCount => "Restaurants",
            Metric::AverageRating => "Average rating",
            Metric::AverageReviewCount => "Average reviews",
            Metric::EventCount => "Events",
        }
    }

    fn sql(self) -> &'static str {
        match self {
            Metric::RestaurantCount => {
                "SELECT COUNT(*), Locations.City FROM Restaurants
                 JOIN Locations ON Restaurants.LocationId = Locations.Id
                 WHERE Locations.City = ?1 COLLATE NOCASE AND Locations.State = ?2 COLLATE NOCASE"
            }
            Metric::AverageRating => {
                "SELECT AVG(Restaurants.Rating), Locations.City FROM Restaurants
                 JOIN Locations ON Restaurants.LocationId = Locations.Id
                 WHERE Locations.City = ?1 COLLATE NOCASE AND Locations.State = ?2 COLLATE NOCASE"
            }
            Metric::AverageReviewCount => {
                "SELECT AVG(Restaurants.TotalReviews), Locations.City FROM Restaurants
                 JOIN Locations ON Restaurants.LocationId = Locations.Id
                 WHERE Locations.City = ?1 COLLATE NOCASE AND Locations.State = ?2 COLLATE NOCASE"
            }
            Metric::EventCount => {
                "SELECT COUNT(*), Locations.City FROM Events
                 JOIN Locations ON Events.LocationId = Locations.Id
                 WHERE Locations.City = ?1 COLLATE NOCASE AND Locations.State = ?2 COLLATE NOCASE"
            }
        }
    }
}

/// Result of an aggregate query.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// `None` when an average has no rows to average.
    pub value: Option<f64>,
    pub city: String,
}

impl CompareDb {
    /// Compute `metric` for `city` within this database's state.
    pub async fn query_aggregate(&self, city: &str, metric: Metric) -> Result<Aggregate, Error> {
        let normalized = normalize_city_name(city);
        let state = self.state.clone();
        let bound = normalized.clone();

        let (value, label) = self
            .conn
            .call(move |conn| -> Result<(Option<f64>, Option<String>), Error> {
                let row = conn.query_row(metric.sql(), params![bound, state], |row| {
                    Ok((row.get::<_, Option<f64>>(0)?, row.get::<_, Option<String>>(1)?))
                })?;
                Ok(row)
            })
            .await
            .map_err(Error::from)?;

        tracing::debug!(city = %normalized, ?metric, ?value, "aggregate");
        Ok(Aggregate { value, city: label.unwrap_or(normalized) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{BusinessRecord, CityRecord, EventRecord};

    fn restaurant(id: &str, city: &str, rating: f64, reviews: i64) -> BusinessRecord {
        BusinessRecord {
            id: id.to_string(),
            name: id.to_string(),
            price: None,
            rating: Some(rating),
            review_count: Some(reviews),
            phone: Some("(313) 555-0100".to_string()),
            city: Some(city.to_string()),
            state: Some("MI".to_string()),
        }
    }

    async fn seeded() -> CompareDb {
        let db = CompareDb::open_in_memory().await.unwrap();
        db.store_locations(&[
            CityRecord { city: "Detroit".into(), state: "MI".into() },
            CityRecord { city: "Ann Arbor".into(), state: "MI".into() },
        ])
        .await
        .unwrap();
        db.store_restaurants(
            &[restaurant("a", "Detroit", 4.0, 10), restaurant("b", "Detroit", 3.0, 30)],
            "detroit",
        )
        .await
        .unwrap();
        db.store_events(&[EventRecord {
            name: "Jazz".into(),
            location: "Hall".into(),
            city: "Ann Arbor".into(),
            state: "MI".into(),
            day: "Fri".into(),
            date: "May 01".into(),
            time: "8:00 PM".into(),
        }])
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn test_restaurant_count() {
        let db = seeded().await;
        let agg = db.query_aggregate("detroit", Metric::RestaurantCount).await.unwrap();
        assert_eq!(agg, Aggregate { value: Some(2.0), city: "Detroit".to_string() });
    }

    #[tokio::test]
    async fn test_average_rating() {
        let db = seeded().await;
        let agg = db.query_aggregate("DETROIT", Metric::AverageRating).await.unwrap();
        assert_eq!(agg.value, Some(3.5));
    }

    #[tokio::test]
    async fn test_average_review_count() {
        let db = seeded().await;
        let agg = db.query_aggregate("detroit", Metric::AverageReviewCount).await.unwrap();
        assert_eq!(agg.value, Some(20.0));
    }

    #[tokio::test]
    async fn test_event_count_multi_word_city() {
        let db = seeded().await;
        let agg = db.query_aggregate("ann arbor", Metric::EventCount).await.unwrap();
        assert_eq!(agg, Aggregate { value: Some(1.0), city: "Ann Arbor".to_string() });
    }

    #[tokio::test]
    async fn test_empty_city_falls_back_to_normalized_label() {
        let db = seeded().await;

        let count = db.query_aggregate("lansing", Metric::RestaurantCount).await.unwrap();
        assert_eq!(count, Aggregate { value: Some(0.0), city: "Lansing".to_string() });

        let avg = db.query_aggregate("lansing", Metric::AverageRating).await.unwrap();
        assert_eq!(avg, Aggregate { value: None, city: "Lansing".to_string() });
    }

    #[tokio::test]
    async fn test_inner_capitals_match_stored_city() {
        let db = CompareDb::open_in_memory().await.unwrap();
        db.store_locations(&[CityRecord { city: "DeWitt".into(), state: "MI".into() }]).await.unwrap();
        let inserted = db.store_restaurants(&[restaurant("d", "DeWitt", 4.5, 12)], "dewitt").await.unwrap();
        assert_eq!(inserted, 1);

        let count = db.query_aggregate("dewitt", Metric::RestaurantCount).await.unwrap();
        assert_eq!(count, Aggregate { value: Some(1.0), city: "DeWitt".to_string() });

        let rating = db.query_aggregate("DEWITT", Metric::AverageRating).await.unwrap();
        assert_eq!(rating.value, Some(4.5));
    }

    #[tokio::test]
    async fn test_quote_in_city_is_bound_not_interpolated() {
        let db = seeded().await;
        let agg = db.query_aggregate("detroit\" OR \"1\"=\"1", Metric::RestaurantCount).await.unwrap();
        assert_eq!(agg.value, Some(0.0));
    }
}
