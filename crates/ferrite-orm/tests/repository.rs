//! Repository tests against an in-memory `SQLite` store.

mod common;

use common::{Quiz, User, test_store};
use ferrite_orm::{Criteria, Direction, Repository};

fn user(name: &str, email: &str) -> User {
    User { name: name.to_string(), email: email.to_string(), ..User::default() }
}

fn quiz(name: &str, grade: i64) -> Quiz {
    Quiz { name: name.to_string(), grade, ..Quiz::default() }
}

#[test]
fn upsert_assigns_generated_identity() {
    let store = test_store();
    let users = Repository::<User>::new(store);

    let mut first = user("ciwawa", "a@b.c");
    users.upsert(&mut first).unwrap();
    assert_eq!(first.id, 1);

    let mut second = user("basarab", "b@b.c");
    users.upsert(&mut second).unwrap();
    assert_eq!(second.id, 2);
}

#[test]
fn find_round_trips_the_entity() {
    let store = test_store();
    let users = Repository::<User>::new(store);

    let mut saved = user("ciwawa", "a@b.c");
    users.upsert(&mut saved).unwrap();

    let found = users.find(saved.id).unwrap().expect("row should exist");
    assert_eq!(found, saved);
}

#[test]
fn find_missing_row_is_none_not_error() {
    let store = test_store();
    let users = Repository::<User>::new(store);

    assert_eq!(users.find(999).unwrap(), None);
}

#[test]
fn upsert_with_identity_updates_in_place() {
    let store = test_store();
    let users = Repository::<User>::new(store);

    let mut saved = user("ciwawa", "a@b.c");
    users.upsert(&mut saved).unwrap();
    let id = saved.id;

    saved.email = "new@b.c".to_string();
    users.upsert(&mut saved).unwrap();
    assert_eq!(saved.id, id);

    let found = users.find(id).unwrap().unwrap();
    assert_eq!(found.email, "new@b.c");
    assert_eq!(users.count(&Criteria::new()).unwrap(), 1);
}

#[test]
fn upsert_omits_unset_columns() {
    let store = test_store();
    let users = Repository::<User>::new(store);

    let mut saved = user("ciwawa", "a@b.c");
    users.upsert(&mut saved).unwrap();

    // A partial entity: the empty email must not clobber the stored one.
    let mut partial = User { id: saved.id, name: "renamed".to_string(), email: String::new() };
    users.upsert(&mut partial).unwrap();

    let found = users.find(saved.id).unwrap().unwrap();
    assert_eq!(found.name, "renamed");
    assert_eq!(found.email, "a@b.c");
}

#[test]
fn upsert_persists_zero_values() {
    let store = test_store();
    let quizzes = Repository::<Quiz>::new(store);

    let mut saved = quiz("algebra", 10);
    quizzes.upsert(&mut saved).unwrap();

    saved.grade = 0;
    quizzes.upsert(&mut saved).unwrap();

    let found = quizzes.find(saved.id).unwrap().unwrap();
    assert_eq!(found.grade, 0);
}

#[test]
fn upsert_with_no_persisted_values_is_an_error() {
    let store = test_store();
    let users = Repository::<User>::new(store);

    let mut empty = User::default();
    let err = users.upsert(&mut empty).unwrap_err();
    assert!(err.to_string().contains("no persisted values"));
}

#[test]
fn find_by_filters_and_sorts() {
    let store = test_store();
    let quizzes = Repository::<Quiz>::new(store);

    for (name, grade) in [("algebra", 7), ("geometry", 10), ("history", 7)] {
        quizzes.upsert(&mut quiz(name, grade)).unwrap();
    }

    let sevens = quizzes
        .find_by(&Criteria::new().filter("grade", 7i64).sort("name", Direction::Desc), 0, 10)
        .unwrap();
    let names: Vec<_> = sevens.iter().map(|q| q.name.as_str()).collect();
    assert_eq!(names, ["history", "algebra"]);
}

#[test]
fn find_by_paginates_without_overlap() {
    let store = test_store();
    let users = Repository::<User>::new(store);

    for i in 0..5 {
        users.upsert(&mut user(&format!("user{i}"), &format!("u{i}@b.c"))).unwrap();
    }

    let criteria = Criteria::new().sort("id", Direction::Asc);
    let first = users.find_by(&criteria, 0, 2).unwrap();
    let second = users.find_by(&criteria, 2, 2).unwrap();
    let third = users.find_by(&criteria, 4, 2).unwrap();

    let ids: Vec<_> =
        first.iter().chain(&second).chain(&third).map(|u| u.id).collect();
    assert_eq!(ids, [1, 2, 3, 4, 5]);

    // Past the end: empty, not an error.
    assert!(users.find_by(&criteria, 10, 2).unwrap().is_empty());
}

#[test]
fn find_one_by_returns_a_single_match() {
    let store = test_store();
    let users = Repository::<User>::new(store);

    users.upsert(&mut user("ciwawa", "a@b.c")).unwrap();
    users.upsert(&mut user("basarab", "b@b.c")).unwrap();

    let found = users.find_one_by(&Criteria::new().filter("name", "basarab")).unwrap().unwrap();
    assert_eq!(found.email, "b@b.c");

    assert!(users.find_one_by(&Criteria::new().filter("name", "nobody")).unwrap().is_none());
}

#[test]
fn search_matches_substrings_case_insensitively() {
    let store = test_store();
    let users = Repository::<User>::new(store);

    users.upsert(&mut user("ciwawa", "Someone@Example.COM")).unwrap();
    users.upsert(&mut user("basarab", "other@elsewhere.net")).unwrap();

    let hits = users.find_by(&Criteria::new().search("email", "EXAMPLE"), 0, 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "ciwawa");
}

#[test]
fn count_applies_filters_and_search() {
    let store = test_store();
    let quizzes = Repository::<Quiz>::new(store);

    for (name, grade) in [("algebra", 7), ("geometry", 10), ("history", 7)] {
        quizzes.upsert(&mut quiz(name, grade)).unwrap();
    }

    assert_eq!(quizzes.count(&Criteria::new()).unwrap(), 3);
    assert_eq!(quizzes.count(&Criteria::new().filter("grade", 7i64)).unwrap(), 2);
    assert_eq!(quizzes.count(&Criteria::new().search("name", "geo")).unwrap(), 1);
    assert_eq!(quizzes.count(&Criteria::new().filter("grade", 99i64)).unwrap(), 0);
}

#[test]
fn delete_reports_whether_a_row_was_removed() {
    let store = test_store();
    let users = Repository::<User>::new(store);

    let mut saved = user("ciwawa", "a@b.c");
    users.upsert(&mut saved).unwrap();

    assert!(users.delete(&saved).unwrap());
    assert_eq!(users.find(saved.id).unwrap(), None);

    // Deleting again is a no-op, not an error.
    assert!(!users.delete(&saved).unwrap());
}

#[test]
fn relationships_round_trip_through_the_foreign_key() {
    let store = test_store();
    let users = Repository::<User>::new(store.clone());
    let quizzes = Repository::<Quiz>::new(store);

    let mut owner = user("ciwawa", "a@b.c");
    users.upsert(&mut owner).unwrap();

    let mut algebra = quiz("algebra", 10);
    let mut history = quiz("history", 7);
    quizzes.upsert(&mut algebra).unwrap();
    quizzes.upsert(&mut history).unwrap();

    quizzes.set_foreign_key::<User>(owner.id, &algebra).unwrap();
    quizzes.set_foreign_key::<User>(owner.id, &history).unwrap();

    let taker = quizzes.related_one::<User>(&algebra).unwrap().expect("owner should resolve");
    assert_eq!(taker, owner);

    let mut taken = users.related_many::<Quiz>(&owner).unwrap();
    taken.sort_by_key(|q| q.id);
    assert_eq!(taken, vec![algebra, history]);

    // Unlinked quiz: no owner.
    let mut orphan = quiz("orphan", 0);
    quizzes.upsert(&mut orphan).unwrap();
    assert!(quizzes.related_one::<User>(&orphan).unwrap().is_none());

    // Criteria-level foreign-key constraint matches the same rows.
    let related = quizzes.count(&Criteria::new().related_to::<User>(owner.id)).unwrap();
    assert_eq!(related, 2);
}
