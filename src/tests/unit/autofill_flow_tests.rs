//! End-to-end autofill flow: type, search, pick, save.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::core::autofill::{
    AutofillController, AutofillPolicy, BookForm, FormError, FormField, ResultsView, DEFAULT_DEBOUNCE,
};
use crate::core::books::{IndustryIdentifier, LookupError, RawVolume, VolumeInfo};
use crate::core::library::Library;
use crate::tests::mocks::{volume, volume_with, ScriptedLookup};

fn searched(lookup: ScriptedLookup, query: &str) -> AutofillController {
    let mut c = AutofillController::new(Arc::new(lookup), BookForm::full(), AutofillPolicy::default());
    let t0 = Instant::now();
    c.on_input_at(query, t0);
    c.poll_at(t0 + DEFAULT_DEBOUNCE);
    c
}

fn earthsea() -> RawVolume {
    RawVolume {
        id: "earthsea-1".into(),
        volume_info: VolumeInfo {
            title: Some("A Wizard of Earthsea".into()),
            authors: vec!["Ursula K. Le Guin".into()],
            page_count: Some(183),
            industry_identifiers: vec![IndustryIdentifier::new("ISBN_13", "9780547773742")],
            ..Default::default()
        },
    }
}

#[tokio::test]
async fn test_pick_and_save_into_library() {
    let lookup = ScriptedLookup::new().respond("earthsea", Duration::ZERO, Ok(vec![earthsea()]));
    let mut c = searched(lookup, "earthsea");
    assert!(c.next_outcome().await);
    assert_eq!(c.candidates().len(), 1);

    assert!(c.on_select(0));
    assert_eq!(c.form().submit(), Err(FormError::Missing(FormField::Category)));
    assert!(c.form_mut().set_value(FormField::Category, "Fantasy"));
    let new_book = c.form().submit().unwrap();
    assert_eq!(new_book.title, "A Wizard of Earthsea");
    assert_eq!(new_book.total_pages, 183);
    assert_eq!(new_book.isbn.as_deref(), Some("9780547773742"));
    assert_eq!(new_book.external_id.as_deref(), Some("earthsea-1"));

    let mut library = Library::in_memory();
    let (id, created) = library.add_book(new_book.clone());
    assert!(created);
    let fantasy = library.category_by_name("fantasy").unwrap().id;
    assert_eq!(library.book(id).unwrap().category, Some(fantasy));

    // Same volume picked again is recognised as a duplicate.
    let (again, created) = library.add_book(new_book);
    assert!(!created);
    assert_eq!(again, id);

    let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let book = library.log_reading(id, day, 183).unwrap();
    assert!(book.is_completed());
    assert_eq!(library.completed().len(), 1);
}

#[tokio::test]
async fn test_missing_page_count_must_be_typed_in() {
    let lookup = ScriptedLookup::new().respond(
        "emma",
        Duration::ZERO,
        Ok(vec![volume_with("emma-1", "Emma", "Jane Austen", None)]),
    );
    let mut c = searched(lookup, "emma");
    c.next_outcome().await;
    c.on_select(0);

    assert!(!c.form().is_locked(FormField::TotalPages));
    assert_eq!(c.form().submit(), Err(FormError::Missing(FormField::TotalPages)));

    assert!(c.form_mut().set_value(FormField::TotalPages, "474"));
    assert!(c.form_mut().set_value(FormField::Category, "Classics"));
    assert_eq!(c.form().submit().unwrap().total_pages, 474);
}

#[tokio::test]
async fn test_authorless_pick_leaves_author_editable() {
    let lookup = ScriptedLookup::new().respond("beowulf", Duration::ZERO, Ok(vec![volume("b-1", "Beowulf")]));
    let mut c = searched(lookup, "beowulf");
    c.next_outcome().await;
    c.on_select(0);

    assert!(c.form().is_locked(FormField::Title));
    assert!(!c.form().is_locked(FormField::Author));
    assert!(c.form_mut().set_value(FormField::Author, "Unknown"));
    assert!(!c.form_mut().set_value(FormField::Title, "Other"));
}

#[tokio::test]
async fn test_error_then_retry_recovers() {
    let lookup = Arc::new(
        ScriptedLookup::new()
            .respond("dune", Duration::ZERO, Err(LookupError::Service { status: 503 }))
            .respond("dune messiah", Duration::ZERO, Ok(vec![volume("dm-1", "Dune Messiah")])),
    );
    let mut c = AutofillController::new(lookup.clone(), BookForm::full(), AutofillPolicy::default());

    let t0 = Instant::now();
    c.on_input_at("dune", t0);
    c.poll_at(t0 + DEFAULT_DEBOUNCE);
    c.next_outcome().await;
    assert!(c.results_view().is_error());

    let t1 = t0 + Duration::from_secs(1);
    c.on_input_at("dune messiah", t1);
    c.poll_at(t1 + DEFAULT_DEBOUNCE);
    c.next_outcome().await;
    assert_eq!(
        c.results_view(),
        &ResultsView::Candidates {
            query: "dune messiah".into(),
            count: 1
        }
    );
    assert_eq!(lookup.calls(), vec!["dune", "dune messiah"]);
}
