//! Add-book form model: independently lockable fields plus the search box.
//!
//! Locked means read-only. A locked field keeps its value (it is still
//! submitted) but refuses manual edits until unlocked.

use std::collections::HashMap;

use crate::core::library::{NewBook, Rating};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormField {
    Title,
    Author,
    TotalPages,
    Category,
    Isbn,
    Cover,
    ExternalId,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Title,
        FormField::Author,
        FormField::TotalPages,
        FormField::Category,
        FormField::Isbn,
        FormField::Cover,
        FormField::ExternalId,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Author => "Author",
            Self::TotalPages => "Total pages",
            Self::Category => "Category",
            Self::Isbn => "ISBN",
            Self::Cover => "Cover URL",
            Self::ExternalId => "Volume ID",
        }
    }

    /// Metadata fields are carried along but not meant for typing.
    pub fn is_metadata(self) -> bool {
        matches!(self, Self::Isbn | Self::Cover | Self::ExternalId)
    }

    pub fn required(self) -> bool {
        !self.is_metadata()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{} is required", .0.label())]
    Missing(FormField),

    #[error("Enter a valid page total (at least 1)")]
    InvalidPageTotal,
}

/// The set of dependent fields present on a given form.
#[derive(Clone, Debug, Default)]
pub struct BookForm {
    fields: HashMap<FormField, FieldState>,
}

impl BookForm {
    /// A form carrying every field.
    pub fn full() -> Self {
        Self::with_fields(FormField::ALL)
    }

    /// A form carrying only `fields`; writes to the others are ignored.
    pub fn with_fields(fields: impl IntoIterator<Item = FormField>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|f| (f, FieldState::default()))
                .collect(),
        }
    }

    pub fn has(&self, field: FormField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn get(&self, field: FormField) -> Option<&FieldState> {
        self.fields.get(&field)
    }

    pub fn value(&self, field: FormField) -> Option<&str> {
        self.get(field).map(|s| s.value.as_str())
    }

    pub fn is_locked(&self, field: FormField) -> bool {
        self.get(field).is_some_and(|s| s.locked)
    }

    /// Present fields in display order.
    pub fn present(&self) -> impl Iterator<Item = FormField> + '_ {
        FormField::ALL.into_iter().filter(|f| self.has(*f))
    }

    /// Auto-fill from a candidate: a non-empty value is written and locked,
    /// an empty one clears the field and leaves it editable.
    pub fn fill(&mut self, field: FormField, value: &str) {
        let Some(state) = self.fields.get_mut(&field) else {
            return;
        };
        let value = value.trim();
        state.value = value.to_string();
        state.locked = !value.is_empty();
    }

    /// Manual entry. Returns false for locked or absent fields.
    pub fn set_value(&mut self, field: FormField, value: impl Into<String>) -> bool {
        match self.fields.get_mut(&field) {
            Some(state) if !state.locked => {
                state.value = value.into();
                true
            }
            _ => false,
        }
    }

    pub fn unlock(&mut self, field: FormField) {
        if let Some(state) = self.fields.get_mut(&field) {
            state.locked = false;
        }
    }

    pub fn unlock_all(&mut self) {
        for state in self.fields.values_mut() {
            state.locked = false;
        }
    }

    /// Clear every value and lock.
    pub fn reset(&mut self) {
        for state in self.fields.values_mut() {
            *state = FieldState::default();
        }
    }

    pub fn locked_fields(&self) -> Vec<FormField> {
        self.present().filter(|f| self.is_locked(*f)).collect()
    }

    /// Validate and build the record to store.
    pub fn submit(&self) -> Result<NewBook, FormError> {
        let text = |field: FormField| {
            self.value(field)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let title = text(FormField::Title).ok_or(FormError::Missing(FormField::Title))?;
        let author = text(FormField::Author).ok_or(FormError::Missing(FormField::Author))?;
        let total_pages = text(FormField::TotalPages)
            .ok_or(FormError::Missing(FormField::TotalPages))?
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or(FormError::InvalidPageTotal)?;
        let category =
            text(FormField::Category).ok_or(FormError::Missing(FormField::Category))?;

        Ok(NewBook {
            title,
            author,
            total_pages,
            category,
            rating: Rating::default(),
            isbn: text(FormField::Isbn),
            cover_url: text(FormField::Cover),
            external_id: text(FormField::ExternalId),
        })
    }
}

/// The lookup input. Locked once a candidate is selected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchBox {
    pub text: String,
    pub locked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_fill_locks_non_empty_only() {
        let mut form = BookForm::full();
        form.fill(FormField::Title, "Dune");
        form.fill(FormField::TotalPages, "");
        assert_eq!(form.value(FormField::Title), Some("Dune"));
        assert!(form.is_locked(FormField::Title));
        assert_eq!(form.value(FormField::TotalPages), Some(""));
        assert!(!form.is_locked(FormField::TotalPages));
    }

    #[test]
    fn test_fill_empty_clears_previous_value() {
        let mut form = BookForm::full();
        form.fill(FormField::TotalPages, "412");
        form.unlock_all();
        form.fill(FormField::TotalPages, "   ");
        assert_eq!(form.value(FormField::TotalPages), Some(""));
        assert!(!form.is_locked(FormField::TotalPages));
    }

    #[test]
    fn test_absent_fields_are_tolerated() {
        let mut form = BookForm::with_fields([FormField::Title]);
        form.fill(FormField::Isbn, "9780441013593");
        assert!(!form.has(FormField::Isbn));
        assert!(form.value(FormField::Isbn).is_none());
        assert!(!form.set_value(FormField::Author, "x"));
        form.unlock(FormField::Cover);
    }

    #[test]
    fn test_locked_field_refuses_manual_edit() {
        let mut form = BookForm::full();
        form.fill(FormField::Author, "Frank Herbert");
        assert!(!form.set_value(FormField::Author, "Someone"));
        assert_eq!(form.value(FormField::Author), Some("Frank Herbert"));
        form.unlock(FormField::Author);
        assert!(form.set_value(FormField::Author, "Someone"));
    }

    #[test]
    fn test_present_keeps_display_order() {
        let form = BookForm::with_fields([FormField::Isbn, FormField::Title]);
        let present: Vec<_> = form.present().collect();
        assert_eq!(present, vec![FormField::Title, FormField::Isbn]);
    }

    #[test]
    fn test_submit_builds_new_book() {
        let mut form = BookForm::full();
        form.fill(FormField::Title, "Dune");
        form.fill(FormField::Author, "Frank Herbert");
        form.set_value(FormField::TotalPages, "412");
        form.fill(FormField::Isbn, "9780441013593");
        form.set_value(FormField::Category, " Fiction ");

        let book = form.submit().unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.category, "Fiction");
        assert_eq!(book.rating, Rating::Fair);
        assert_eq!(book.total_pages, 412);
        assert_eq!(book.isbn.as_deref(), Some("9780441013593"));
        assert!(book.cover_url.is_none());
    }

    #[rstest]
    #[case("", FormError::Missing(FormField::TotalPages))]
    #[case("0", FormError::InvalidPageTotal)]
    #[case("-3", FormError::InvalidPageTotal)]
    #[case("lots", FormError::InvalidPageTotal)]
    fn test_submit_rejects_bad_page_total(#[case] pages: &str, #[case] expected: FormError) {
        let mut form = BookForm::full();
        form.set_value(FormField::Title, "Dune");
        form.set_value(FormField::Author, "Frank Herbert");
        form.set_value(FormField::TotalPages, pages);
        assert_eq!(form.submit().unwrap_err(), expected);
    }

    #[test]
    fn test_submit_requires_fields_in_display_order() {
        let mut form = BookForm::full();
        assert_eq!(
            form.submit().unwrap_err(),
            FormError::Missing(FormField::Title)
        );
        form.set_value(FormField::Title, "Dune");
        assert_eq!(
            form.submit().unwrap_err(),
            FormError::Missing(FormField::Author)
        );
        form.set_value(FormField::Author, "Frank Herbert");
        form.set_value(FormField::TotalPages, "412");
        assert_eq!(
            form.submit().unwrap_err(),
            FormError::Missing(FormField::Category)
        );
        form.set_value(FormField::Category, "   ");
        assert_eq!(
            form.submit().unwrap_err(),
            FormError::Missing(FormField::Category)
        );
        form.set_value(FormField::Category, "Fiction");
        assert!(form.submit().is_ok());
    }

    #[rstest]
    #[case(FormField::Title, true)]
    #[case(FormField::TotalPages, true)]
    #[case(FormField::Category, true)]
    #[case(FormField::Isbn, false)]
    #[case(FormField::ExternalId, false)]
    fn test_required_fields_are_the_typed_ones(#[case] field: FormField, #[case] required: bool) {
        assert_eq!(field.required(), required);
        assert_eq!(field.is_metadata(), !required);
    }

    #[test]
    fn test_error_message_names_field() {
        assert_eq!(
            FormError::Missing(FormField::TotalPages).to_string(),
            "Total pages is required"
        );
    }
}
