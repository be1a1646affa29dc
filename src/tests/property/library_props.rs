//! Property tests for reading progress and shelf filtering.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use crate::core::library::{BookFilter, BookOrder, Library, NewBook, StatusFilter};

fn book(total_pages: u32) -> NewBook {
    NewBook {
        title: "Prop".into(),
        author: "Tester".into(),
        total_pages,
        ..Default::default()
    }
}

fn shelf_entry() -> impl Strategy<Value = (String, String, u32, String, bool)> {
    (
        "[a-e]{1,6}",
        "[a-e]{1,6}",
        1u32..600,
        prop_oneof![Just(""), Just("Fiction"), Just("Science")],
        any::<bool>(),
    )
        .prop_map(|(title, author, pages, category, finished)| {
            (title, author, pages, category.to_string(), finished)
        })
}

fn status() -> impl Strategy<Value = StatusFilter> {
    prop_oneof![
        Just(StatusFilter::All),
        Just(StatusFilter::Reading),
        Just(StatusFilter::Completed)
    ]
}

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

proptest! {
    #[test]
    fn pages_read_never_exceed_total(
        total in 1u32..2000,
        logs in proptest::collection::vec((0u64..60, 1u32..500), 0..40),
    ) {
        let mut library = Library::in_memory();
        let (id, _) = library.add_book(book(total));

        for (offset, pages) in logs {
            let day = base_day() + Days::new(offset);
            library.log_reading(id, day, pages).unwrap();
        }

        let b = library.book(id).unwrap();
        prop_assert!(b.pages_read <= b.total_pages);
        prop_assert_eq!(b.is_completed(), b.pages_read == b.total_pages);
        prop_assert!(b.progress_pct() <= 100.0);
    }

    #[test]
    fn daily_totals_cover_range(span in 0u64..90, logs in proptest::collection::vec((0u64..90, 1u32..50), 0..20)) {
        let mut library = Library::in_memory();
        let (id, _) = library.add_book(book(10_000));
        for (offset, pages) in &logs {
            library.log_reading(id, base_day() + Days::new(*offset), *pages).unwrap();
        }

        let to = base_day() + Days::new(span);
        let totals = library.daily_totals(base_day(), to);
        prop_assert_eq!(totals.len() as u64, span + 1);
        prop_assert!(totals.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn filter_returns_exactly_the_matching_books_in_order(
        shelf in proptest::collection::vec(shelf_entry(), 0..20),
        text in "[a-e]{0,2}",
        min in proptest::option::of(1u32..600),
        max in proptest::option::of(1u32..600),
        by_category in any::<bool>(),
        status in status(),
        order_index in 0usize..BookOrder::ALL.len(),
    ) {
        let mut library = Library::in_memory();
        for (title, author, pages, category, finished) in shelf {
            let (id, created) = library.add_book(NewBook {
                title,
                author,
                total_pages: pages,
                category,
                ..Default::default()
            });
            if created && finished {
                library.log_reading(id, base_day(), pages).unwrap();
            }
        }

        let filter = BookFilter {
            text,
            category: if by_category {
                library.category_by_name("fiction").map(|c| c.id)
            } else {
                None
            },
            min_pages: min,
            max_pages: max,
            status,
            ..Default::default()
        };
        let order = BookOrder::ALL[order_index];
        let shown = library.filter(&filter, order);

        prop_assert!(shown.iter().all(|b| filter.matches(b)));
        let expected = library.books().iter().filter(|b| filter.matches(b)).count();
        prop_assert_eq!(shown.len(), expected);
        prop_assert!(shown
            .windows(2)
            .all(|w| order.compare(w[0], w[1]) != std::cmp::Ordering::Greater));
    }
}
