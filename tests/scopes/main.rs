//! Integration tests for movie scopes (MovieQuery + MovieQueries).

mod fixtures;

use fixtures::*;
use moovover::{ArgumentError, CatalogError, MovieQuery};

/// Aladdin (G): 5, 4, 3 from three moviegoers, latest 2 days ago.
/// Heat (R): 5, 5, reviewed 30 days ago.
/// Up (PG): never reviewed.
/// Amelie (R): 2.
fn seeded() -> TestCatalog {
    let catalog = catalog_at(now());
    let aladdin = add_movie(&catalog, "Aladdin", "G");
    let heat = add_movie(&catalog, "Heat", "R");
    add_movie(&catalog, "Up", "PG");
    let amelie = add_movie(&catalog, "Amelie", "R");

    let alice = add_moviegoer(&catalog, "alice");
    let bob = add_moviegoer(&catalog, "bob");
    let carol = add_moviegoer(&catalog, "carol");

    let store = catalog.store();
    add_review(store, aladdin, alice, 5, 10);
    add_review(store, aladdin, bob, 4, 9);
    add_review(store, aladdin, carol, 3, 2);
    add_review(store, heat, alice, 5, 30);
    add_review(store, heat, bob, 5, 30);
    add_review(store, amelie, carol, 2, 8);

    catalog
}

#[test]
fn unfiltered_query_lists_everything_in_id_order() {
    let catalog = seeded();
    let movies = catalog.list_movies_by(&MovieQuery::new()).unwrap();
    assert_eq!(titles(&movies), vec!["Aladdin", "Heat", "Up", "Amelie"]);
}

#[test]
fn for_kids() {
    let catalog = seeded();
    let movies = catalog.list_movies_by(&MovieQuery::new().for_kids()).unwrap();
    assert_eq!(titles(&movies), vec!["Aladdin", "Up"]);
}

#[test]
fn with_good_reviews_is_strictly_above_cutoff() {
    let catalog = seeded();
    // Aladdin averages exactly 4
    let movies = catalog
        .list_movies_by(&MovieQuery::new().with_good_reviews(4))
        .unwrap();
    assert_eq!(titles(&movies), vec!["Heat"]);

    let movies = catalog
        .list_movies_by(&MovieQuery::new().with_good_reviews(1.5))
        .unwrap();
    assert_eq!(titles(&movies), vec!["Aladdin", "Heat", "Amelie"]);
}

#[test]
fn recently_reviewed_defaults_to_a_week() {
    let catalog = seeded();
    let movies = catalog
        .list_movies_by(&MovieQuery::new().recently_reviewed(None))
        .unwrap();
    assert_eq!(titles(&movies), vec!["Aladdin"]);

    let movies = catalog
        .list_movies_by(&MovieQuery::new().recently_reviewed(30))
        .unwrap();
    assert_eq!(titles(&movies), vec!["Aladdin", "Heat", "Amelie"]);
}

#[test]
fn recently_reviewed_with_no_matches_is_empty() {
    let catalog = seeded();
    let movies = catalog
        .list_movies_by(&MovieQuery::new().recently_reviewed(1))
        .unwrap();
    assert!(movies.is_empty());
}

#[test]
fn with_many_reviews_defaults_to_three() {
    let catalog = seeded();
    let movies = catalog
        .list_movies_by(&MovieQuery::new().with_many_reviews(None))
        .unwrap();
    assert_eq!(titles(&movies), vec!["Aladdin"]);

    // zero still excludes unreviewed movies
    let movies = catalog
        .list_movies_by(&MovieQuery::new().with_many_reviews(0))
        .unwrap();
    assert_eq!(titles(&movies), vec!["Aladdin", "Heat", "Amelie"]);
}

#[test]
fn chained_scopes_narrow() {
    let catalog = seeded();
    let query = MovieQuery::new()
        .for_kids()
        .with_good_reviews(3)
        .recently_reviewed(None);
    let movies = catalog.list_movies_by(&query).unwrap();
    assert_eq!(titles(&movies), vec!["Aladdin"]);

    let query = MovieQuery::new().with_good_reviews(4.5).recently_reviewed(None);
    assert!(catalog.list_movies_by(&query).unwrap().is_empty());
}

#[test]
fn a_query_is_reusable_and_sees_new_data() {
    let catalog = seeded();
    let query = MovieQuery::new().with_many_reviews(2);
    assert_eq!(titles(&catalog.list_movies_by(&query).unwrap()), vec!["Aladdin", "Heat"]);

    let amelie = 4;
    let dave = add_moviegoer(&catalog, "dave");
    add_review(catalog.store(), amelie, dave, 4, 0);
    assert_eq!(
        titles(&catalog.list_movies_by(&query).unwrap()),
        vec!["Aladdin", "Heat", "Amelie"]
    );
}

#[test]
fn deleting_a_movie_removes_its_reviews_from_scopes() {
    let catalog = seeded();
    catalog.delete_movie(1).unwrap();
    let movies = catalog
        .list_movies_by(&MovieQuery::new().with_good_reviews(0))
        .unwrap();
    assert_eq!(titles(&movies), vec!["Heat", "Amelie"]);
    assert!(catalog.reviews_by(3).unwrap().iter().all(|r| r.movie_id() != Some(1)));
}

#[test]
fn invalid_arguments_are_rejected_at_execution() {
    let catalog = seeded();
    let err = catalog
        .list_movies_by(&MovieQuery::new().recently_reviewed(-3))
        .unwrap_err();
    assert_eq!(err, CatalogError::Argument(ArgumentError::NegativeDays(-3)));
    assert_eq!(err.status_code(), 400);

    let err = catalog
        .list_movies_by(&MovieQuery::new().with_many_reviews(-1))
        .unwrap_err();
    assert_eq!(err, CatalogError::Argument(ArgumentError::NegativeCount(-1)));
}

#[cfg(feature = "sql")]
#[test]
fn rendered_sql_matches_the_chain() {
    use moovover::SqlParam;

    let sql = MovieQuery::new()
        .for_kids()
        .with_many_reviews(None)
        .to_sql(now())
        .unwrap();
    assert_eq!(
        sql.sql,
        "SELECT movies.* FROM movies WHERE movies.rating IN ('G', 'PG') \
         AND movies.id IN (SELECT reviews.movie_id FROM reviews \
         GROUP BY reviews.movie_id HAVING COUNT(reviews.id) >= $1) \
         ORDER BY movies.id"
    );
    assert_eq!(sql.params, vec![SqlParam::Int(3)]);
}
