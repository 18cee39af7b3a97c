//! Bulk inserts for collected records.

use super::connection::CompareDb;
use super::migrations::{SCHEMA, TABLES};
use crate::records::{BusinessRecord, CityRecord, EventRecord};
use crate::Error;
use tokio_rusqlite::rusqlite::{self, OptionalExtension};
use tokio_rusqlite::params;

const COUNTRY: &str = "USA";

/// Look up the `Locations.Id` for a city/state pair, ignoring ASCII case.
fn location_id(conn: &rusqlite::Connection, city: &str, state: &str) -> Result<Option<i64>, rusqlite::Error> {
    conn.prepare_cached("SELECT Id FROM Locations WHERE City = ?1 COLLATE NOCASE AND State = ?2 COLLATE NOCASE LIMIT 1")?
        .query_row(params![city, state], |row| row.get(0))
        .optional()
}

impl CompareDb {
    /// Drop and recreate the comparison tables.
    pub async fn reset(&self) -> Result<(), Error> {
        self.conn
            .call(|conn| -> Result<(), Error> {
                for table in TABLES {
                    conn.execute(&format!("DROP TABLE IF EXISTS \"{table}\""), [])?;
                }
                conn.execute_batch(SCHEMA)?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        tracing::info!("reset comparison tables");
        Ok(())
    }

    /// Insert cities into `Locations`. Rows are not deduplicated.
    ///
    /// Returns the number of inserted rows.
    pub async fn store_locations(&self, rows: &[CityRecord]) -> Result<usize, Error> {
        let rows = rows.to_vec();
        self.conn
            .call(move |conn| -> Result<usize, Error> {
                let tx = conn.unchecked_transaction()?;
                {
                    let mut stmt = tx.prepare("INSERT INTO Locations (City, State, Country) VALUES (?1, ?2, ?3)")?;
                    for row in &rows {
                        stmt.execute(params![row.city, row.state, COUNTRY])?;
                    }
                }
                tx.commit()?;
                Ok(rows.len())
            })
            .await
            .map_err(Error::from)
    }

    /// Insert events, linking each to its location when the city is known.
    ///
    /// Rows are not deduplicated. Returns the number of inserted rows.
    pub async fn store_events(&self, rows: &[EventRecord]) -> Result<usize, Error> {
        let rows = rows.to_vec();
        self.conn
            .call(move |conn| -> Result<usize, Error> {
                let tx = conn.unchecked_transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO Events (Name, Day, Date, Time, LocationId) VALUES (?1, ?2, ?3, ?4, ?5)",
                    )?;
                    for row in &rows {
                        let location = location_id(&tx, &row.city, &row.state)?;
                        stmt.execute(params![row.name, row.day, row.date, row.time, location])?;
                    }
                }
                tx.commit()?;
                Ok(rows.len())
            })
            .await
            .map_err(Error::from)
    }

    /// Insert the restaurants located in `city` (case-insensitive) within this
    /// database's state. Businesses already stored under the same id are skipped.
    ///
    /// Returns the number of newly inserted rows.
    pub async fn store_restaurants(&self, rows: &[BusinessRecord], city: &str) -> Result<usize, Error> {
        let city = city.trim().to_lowercase();
        let state = self.state.to_lowercase();
        let rows: Vec<BusinessRecord> = rows
            .iter()
            .filter(|row| {
                row.city.as_deref().is_some_and(|c| c.trim().to_lowercase() == city)
                    && row.state.as_deref().is_some_and(|s| s.trim().to_lowercase() == state)
            })
            .cloned()
            .collect();

        let inserted = self
            .conn
            .call(move |conn| -> Result<usize, Error> {
                let tx = conn.unchecked_transaction()?;
                let mut inserted = 0;
                {
                    let mut stmt = tx.prepare(
                        "INSERT OR IGNORE INTO Restaurants
                            (RestaurantId, Name, Price, Rating, TotalReviews, PhoneNumber, LocationId)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    )?;
                    for row in &rows {
                        let location = match (&row.city, &row.state) {
                            (Some(c), Some(s)) => location_id(&tx, c, s)?,
                            _ => None,
                        };
                        inserted += stmt.execute(params![
                            row.id,
                            row.name,
                            row.price,
                            row.rating,
                            row.review_count,
                            row.phone,
                            location
                        ])?;
                    }
                }
                tx.commit()?;
                Ok(inserted)
            })
            .await
            .map_err(Error::from)?;

        tracing::debug!(inserted, "stored restaurants");
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str) -> CityRecord {
        CityRecord { city: name.to_string(), state: "MI".to_string() }
    }

    fn event(name: &str, city: &str) -> EventRecord {
        EventRecord {
            name: name.to_string(),
            location: "Venue".to_string(),
            city: city.to_string(),
            state: "MI".to_string(),
            day: "Sat".to_string(),
            date: "Apr 18".to_string(),
            time: "3:00 PM".to_string(),
        }
    }

    fn business(id: &str, city: &str, state: &str, rating: f64) -> BusinessRecord {
        BusinessRecord {
            id: id.to_string(),
            name: format!("Business {id}"),
            price: Some("$$".to_string()),
            rating: Some(rating),
            review_count: Some(100),
            phone: None,
            city: Some(city.to_string()),
            state: Some(state.to_string()),
        }
    }

    async fn count(db: &CompareDb, sql: &'static str) -> i64 {
        db.conn.call(move |conn| conn.query_row(sql, [], |row| row.get(0))).await.unwrap()
    }

    #[tokio::test]
    async fn test_store_locations() {
        let db = CompareDb::open_in_memory().await.unwrap();
        let stored = db.store_locations(&[city("Detroit"), city("Ann Arbor")]).await.unwrap();
        assert_eq!(stored, 2);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM Locations WHERE Country = 'USA'").await, 2);
    }

    #[tokio::test]
    async fn test_store_events_links_known_cities() {
        let db = CompareDb::open_in_memory().await.unwrap();
        db.store_locations(&[city("Novi")]).await.unwrap();

        db.store_events(&[event("Bingo", "Novi"), event("Fishing", "City Not Available")])
            .await
            .unwrap();

        assert_eq!(count(&db, "SELECT COUNT(*) FROM Events").await, 2);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM Events WHERE LocationId IS NULL").await, 1);
    }

    #[tokio::test]
    async fn test_store_events_duplicates_on_rerun() {
        let db = CompareDb::open_in_memory().await.unwrap();
        let rows = [event("Bingo", "Novi")];
        db.store_events(&rows).await.unwrap();
        db.store_events(&rows).await.unwrap();
        assert_eq!(count(&db, "SELECT COUNT(*) FROM Events").await, 2);
    }

    #[tokio::test]
    async fn test_store_restaurants_filters_city_and_state() {
        let db = CompareDb::open_in_memory().await.unwrap();
        db.store_locations(&[city("Detroit")]).await.unwrap();

        let rows = [
            business("a", "Detroit", "MI", 4.0),
            business("b", "detroit", "mi", 3.0),
            business("c", "Dearborn", "MI", 5.0),
            business("d", "Detroit", "OH", 1.0),
        ];
        let inserted = db.store_restaurants(&rows, "detroit").await.unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM Restaurants").await, 2);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM Restaurants WHERE LocationId IS NOT NULL").await, 2);
    }

    #[tokio::test]
    async fn test_store_restaurants_is_idempotent_by_id() {
        let db = CompareDb::open_in_memory().await.unwrap();
        let rows = [business("a", "Detroit", "MI", 4.0)];

        assert_eq!(db.store_restaurants(&rows, "detroit").await.unwrap(), 1);
        assert_eq!(db.store_restaurants(&rows, "detroit").await.unwrap(), 0);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM Restaurants").await, 1);
    }

    #[tokio::test]
    async fn test_store_restaurants_skips_missing_location() {
        let db = CompareDb::open_in_memory().await.unwrap();
        let mut row = business("a", "Detroit", "MI", 4.0);
        row.city = None;
        assert_eq!(db.store_restaurants(&[row], "detroit").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reset_clears_tables() {
        let db = CompareDb::open_in_memory().await.unwrap();
        db.store_locations(&[city("Detroit")]).await.unwrap();
        db.store_events(&[event("Bingo", "Detroit")]).await.unwrap();

        db.reset().await.unwrap();

        assert_eq!(count(&db, "SELECT COUNT(*) FROM Locations").await, 0);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM Events").await, 0);
    }
}
