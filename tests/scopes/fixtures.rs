use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use moovover::{Catalog, FixedClock, Id, Identity, InMemoryModelStore, MovieParams, ReviewParams};

pub type TestCatalog = Catalog<InMemoryModelStore, FixedClock>;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
}

pub fn catalog_at(at: DateTime<Utc>) -> TestCatalog {
    Catalog::new(InMemoryModelStore::new()).with_clock(FixedClock(at))
}

pub fn add_movie(catalog: &TestCatalog, title: &str, rating: &str) -> Id {
    catalog
        .create_movie(
            MovieParams::new()
                .title(title)
                .rating(rating)
                .release_date(NaiveDate::from_ymd_opt(1995, 6, 1).unwrap()),
        )
        .unwrap()
        .id()
        .unwrap()
}

pub fn add_moviegoer(catalog: &TestCatalog, uid: &str) -> Id {
    catalog
        .find_or_create_moviegoer(Identity::new("developer", uid))
        .unwrap()
        .id()
        .unwrap()
}

/// Review written `days_ago` days before [`now`].
pub fn add_review(store: &InMemoryModelStore, movie: Id, by: Id, potatoes: i64, days_ago: i64) {
    let catalog = Catalog::new(store.clone()).with_clock(FixedClock(now() - TimeDelta::days(days_ago)));
    catalog
        .create_review(movie, by, ReviewParams::new().potatoes(potatoes))
        .unwrap();
}

pub fn titles(movies: &[moovover::Movie]) -> Vec<&str> {
    movies.iter().map(|m| m.title()).collect()
}
