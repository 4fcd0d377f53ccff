//! Integration tests for entity validation through the catalog.

use chrono::NaiveDate;
use moovover::{
    Catalog, Config, ErrorKind, Identity, InMemoryModelStore, Movie, MovieParams, Rating,
    ReviewParams, Validate,
};
use proptest::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn catalog() -> Catalog<InMemoryModelStore> {
    Catalog::new(InMemoryModelStore::new())
}

fn movie(title: &str, rating: Option<&str>, released: Option<NaiveDate>) -> Movie {
    let mut movie = Movie::new();
    movie.set_title(title);
    movie.set_rating(rating.map(str::to_string));
    movie.set_release_date(released);
    movie
}

#[test]
fn modern_movie_needs_known_rating() {
    let catalog = catalog();
    let err = catalog
        .create_movie(
            MovieParams::new()
                .title("Heat")
                .rating("pg")
                .release_date(date(1995, 12, 15)),
        )
        .unwrap_err();

    assert_eq!(err.status_code(), 422);
    let errors = err.validation_errors().unwrap();
    assert_eq!(errors.messages("rating"), vec!["pg is not a valid rating"]);
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["rating"]);
}

#[test]
fn every_known_rating_is_accepted() {
    let catalog = catalog();
    for rating in Rating::ALL {
        let movie = catalog
            .create_movie(
                MovieParams::new()
                    .title(format!("Film {}", rating))
                    .rating(rating.as_str())
                    .release_date(date(2000, 1, 1)),
            )
            .unwrap();
        assert_eq!(movie.known_rating(), Some(rating));
    }
}

#[test]
fn errors_serialize_as_field_map() {
    let catalog = catalog();
    let err = catalog.create_movie(MovieParams::new().title(" ")).unwrap_err();
    let json = serde_json::to_value(err.validation_errors().unwrap()).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "title": ["can't be blank"],
            "release_date": ["can't be blank"],
            "rating": ["is not a valid rating"],
        })
    );
}

#[test]
fn config_from_toml_moves_the_cutoffs() {
    let config = Config::from_toml_str(
        r#"
        grandfather_cutoff = "1935-01-01"
        earliest_release = "1920-01-01"
        title_max_length = 30
        "#,
    )
    .unwrap();

    let mut old = movie("The Public Enemy", Some("Unrated"), Some(date(1931, 4, 23)));
    assert!(old.is_grandfathered_under(&config));
    assert!(old.validate(&config).is_ok());

    // under the defaults it is neither grandfathered nor short enough
    let mut same = old.clone();
    let errors = same.validate(&Config::default()).unwrap_err();
    assert!(errors.has("title", ErrorKind::TooLong));
    assert!(errors.has("rating", ErrorKind::Inclusion));
}

#[test]
fn too_old_message_names_a_full_date_when_needed() {
    let config = Config {
        earliest_release: date(1930, 6, 1),
        ..Config::default()
    };
    let mut m = movie("Early", Some("G"), Some(date(1930, 5, 31)));
    let errors = m.validate(&config).unwrap_err();
    assert_eq!(errors.messages("release_date"), vec!["must be 1930-06-01 or later"]);
}

#[test]
fn review_errors_are_reported_together() {
    let catalog = catalog();
    let movie = catalog
        .create_movie(
            MovieParams::new()
                .title("Aladdin")
                .rating("G")
                .release_date(date(1992, 11, 25)),
        )
        .unwrap();
    let alice = catalog
        .find_or_create_moviegoer(Identity::new("developer", "alice123"))
        .unwrap();

    let err = catalog
        .create_review(
            movie.id().unwrap(),
            alice.id().unwrap(),
            ReviewParams::new().fractional_potatoes(2.5),
        )
        .unwrap_err();
    let errors = err.validation_errors().unwrap();
    assert_eq!(errors.kinds("potatoes"), vec![ErrorKind::NotAnInteger]);
    assert_eq!(errors.full_messages(), vec!["Potatoes must be an integer"]);
}

proptest! {
    #[test]
    fn title_is_trimmed_and_length_checked(
        core in "[A-Za-z0-9]([A-Za-z0-9 ]{0,18}[A-Za-z0-9])?",
        before in "[ \t\n]{0,3}",
        after in "[ \t\n]{0,3}",
    ) {
        let mut m = movie(&format!("{}{}{}", before, core, after), Some("PG"), Some(date(1999, 3, 31)));
        let result = m.validate(&Config::default());

        prop_assert_eq!(m.title(), core.as_str());
        if core.chars().count() <= 10 {
            prop_assert!(result.is_ok());
        } else {
            let errors = result.unwrap_err();
            prop_assert_eq!(errors.kinds("title"), vec![ErrorKind::TooLong]);
        }
    }

    #[test]
    fn only_one_to_five_potatoes_pass(potatoes in -20i64..20) {
        let catalog = catalog();
        let movie = catalog
            .create_movie(MovieParams::new().title("Amelie").rating("R").release_date(date(2001, 4, 25)))
            .unwrap();
        let bob = catalog.find_or_create_moviegoer(Identity::new("developer", "bob456")).unwrap();

        let result = catalog.create_review(
            movie.id().unwrap(),
            bob.id().unwrap(),
            ReviewParams::new().potatoes(potatoes),
        );
        if (1..=5).contains(&potatoes) {
            prop_assert_eq!(result.unwrap().potatoes(), Some(potatoes));
        } else {
            let err = result.unwrap_err();
            prop_assert!(err.validation_errors().unwrap().has("potatoes", ErrorKind::OutOfRange));
        }
    }

    #[test]
    fn rating_rule_depends_on_grandfathering(year in 1850i32..2020, rating in "[A-Z]{1,5}") {
        let config = Config { earliest_release: date(1800, 1, 1), ..Config::default() };
        let mut m = movie("Film", Some(&rating), Some(date(year, 1, 1)));
        let errors = m.validate(&config).err().unwrap_or_default();

        let known = rating.parse::<Rating>().is_ok();
        prop_assert_eq!(errors.has("rating", ErrorKind::Inclusion), !known && year >= 1900);
    }
}
