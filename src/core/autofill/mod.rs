//! Search-as-you-type autofill for the add-book form.

pub mod controller;
pub mod debounce;
pub mod form;
pub mod results;
pub mod sequence;

pub use controller::{AutofillController, AutofillPolicy, LookupOutcome, SearchSession, DEFAULT_DEBOUNCE};
pub use debounce::Debouncer;
pub use form::{BookForm, FieldState, FormError, FormField, SearchBox};
pub use results::ResultsView;
pub use sequence::{RequestSequencer, RequestTicket};
