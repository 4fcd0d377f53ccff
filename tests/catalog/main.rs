//! Integration tests for the catalog: associations, cascades, identity
//! resolution and seeding.

use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use moovover::{
    Catalog, CatalogError, Config, ErrorKind, Identity, InMemoryModelStore, Model, ModelsExt,
    Moviegoer, MovieParams, Review, ReviewParams,
};

fn movie(catalog: &Catalog<InMemoryModelStore>, title: &str) -> u64 {
    catalog
        .create_movie(
            MovieParams::new()
                .title(title)
                .rating("PG")
                .release_date(NaiveDate::from_ymd_opt(2004, 11, 5).unwrap()),
        )
        .unwrap()
        .id()
        .unwrap()
}

fn moviegoer(catalog: &Catalog<InMemoryModelStore>, uid: &str, name: &str) -> u64 {
    catalog
        .find_or_create_moviegoer(Identity::new("developer", uid).with_name(name))
        .unwrap()
        .id()
        .unwrap()
}

#[test]
fn associations_run_through_reviews() {
    let catalog = Catalog::new(InMemoryModelStore::new());
    let aladdin = movie(&catalog, "Aladdin");
    let up = movie(&catalog, "Up");
    let alice = moviegoer(&catalog, "alice123", "Alice");
    let bob = moviegoer(&catalog, "bob456", "Bob");

    catalog.create_review(up, alice, ReviewParams::new().potatoes(5)).unwrap();
    catalog.create_review(aladdin, alice, ReviewParams::new().potatoes(4)).unwrap();
    catalog.create_review(aladdin, bob, ReviewParams::new().potatoes(3)).unwrap();

    let movies: Vec<String> = catalog
        .movies_for(alice)
        .unwrap()
        .iter()
        .map(|m| m.title().to_string())
        .collect();
    assert_eq!(movies, vec!["Up", "Aladdin"]);

    let names: Vec<String> = catalog
        .moviegoers_for(aladdin)
        .unwrap()
        .iter()
        .map(|m| m.display_name().to_string())
        .collect();
    assert_eq!(names, vec!["Alice", "Bob"]);

    let review = &catalog.reviews_for(aladdin).unwrap()[1];
    assert_eq!(review.moviegoer(catalog.store()).unwrap().unwrap().uid(), Some("bob456"));
    assert_eq!(review.movie(catalog.store()).unwrap().unwrap().title(), "Aladdin");
}

#[test]
fn deleting_a_moviegoer_deletes_their_reviews() {
    let catalog = Catalog::new(InMemoryModelStore::new());
    let aladdin = movie(&catalog, "Aladdin");
    let alice = moviegoer(&catalog, "alice123", "Alice");
    let bob = moviegoer(&catalog, "bob456", "Bob");
    catalog.create_review(aladdin, alice, ReviewParams::new().potatoes(4)).unwrap();
    catalog.create_review(aladdin, bob, ReviewParams::new().potatoes(2)).unwrap();

    catalog.delete_moviegoer(alice).unwrap();

    let remaining = catalog.reviews_for(aladdin).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].moviegoer_id(), Some(bob));
    assert_eq!(
        catalog.find_moviegoer(alice).unwrap_err(),
        CatalogError::NotFound {
            collection: "moviegoers",
            id: alice
        }
    );
}

#[test]
fn review_with_dangling_parent_is_rejected() {
    let catalog = Catalog::new(InMemoryModelStore::new());
    let aladdin = movie(&catalog, "Aladdin");
    let alice = moviegoer(&catalog, "alice123", "Alice");

    // bypass the catalog's lookups to reach the store-backed check
    let mut review = Review::new();
    review.set_movie_id(Some(aladdin + 100));
    review.set_moviegoer_id(Some(alice));
    review.set_potatoes(Some(3.into()));

    let err = catalog.validate(&mut review).unwrap_err();
    let errors = err.validation_errors().unwrap();
    assert_eq!(errors.kinds("movie_id"), vec![ErrorKind::Required]);
    assert!(errors.get("moviegoer_id").is_empty());
}

#[test]
fn racing_sign_ins_resolve_to_one_moviegoer() {
    let store = InMemoryModelStore::new();
    let barrier = Arc::new(std::sync::Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let catalog = Catalog::new(store);
                barrier.wait();
                catalog
                    .find_or_create_moviegoer(Identity::new("github", "42"))
                    .unwrap()
                    .id()
            })
        })
        .collect();

    let ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(ids.iter().all(|id| *id == ids[0]));
    assert_eq!(store.models::<Moviegoer>().count().unwrap(), 1);
}

#[test]
fn timestamps_follow_the_clock() {
    use chrono::{TimeZone, Utc};
    use moovover::FixedClock;

    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let later = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    let store = InMemoryModelStore::new();

    let movie = Catalog::new(store.clone())
        .with_clock(FixedClock(created))
        .create_movie(
            MovieParams::new()
                .title("Amelie")
                .rating("R")
                .release_date(NaiveDate::from_ymd_opt(2001, 4, 25).unwrap()),
        )
        .unwrap();
    let id = Model::id(&movie).unwrap();

    let updated = Catalog::new(store)
        .with_clock(FixedClock(later))
        .update_movie(id, MovieParams::new().description("Paris"))
        .unwrap();
    assert_eq!(updated.created_at(), Some(created));
    assert_eq!(updated.updated_at(), Some(later));
}

#[test]
fn seeding_with_room_for_long_titles() {
    let config = Config {
        title_max_length: 30,
        ..Config::default()
    };
    let catalog = Catalog::new(InMemoryModelStore::new()).with_config(config);
    let report = catalog.seed().unwrap();
    assert_eq!(report.movies.len(), 10);
    assert_eq!(report.reviews_created, 6);

    let alice = report
        .moviegoers
        .iter()
        .find(|m| m.display_name() == "Alice")
        .and_then(Moviegoer::id)
        .unwrap();
    let titles: Vec<String> = catalog
        .movies_for(alice)
        .unwrap()
        .iter()
        .map(|m| m.title().to_string())
        .collect();
    assert_eq!(titles, vec!["Aladdin", "The Terminator", "The Incredibles"]);
}
