use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::autofill::AutofillPolicy;
use crate::core::books::{BookLookup, GoogleBooksClient};
use crate::core::library::{BookOrder, Library, LibraryResult};

use super::events::{AppEvent, Notification, NotificationLevel};

/// Centralized handle to the backend.
///
/// Created once at startup and passed by reference to views that need it.
pub struct Services {
    pub lookup: Arc<dyn BookLookup>,
    pub library: Library,
    pub policy: AutofillPolicy,
    /// Shelf order on startup.
    pub shelf_order: BookOrder,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Load the library and build the lookup client from config.
    ///
    /// A corrupt library file is fatal; a missing one starts empty.
    pub fn init(
        config: &AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> LibraryResult<Self> {
        let library_path = config.library_path();
        log::info!("Opening library at {}", library_path.display());
        let library = Library::load(&library_path)?;

        let lookup: Arc<dyn BookLookup> = Arc::new(GoogleBooksClient::from_config(&config.search));
        log::info!("Book lookup via {}", config.search.base_url);

        Ok(Self {
            lookup,
            library,
            policy: AutofillPolicy::from(&config.search),
            shelf_order: BookOrder::from_key(&config.shelf.order),
            event_tx,
        })
    }

    /// Push a notification onto the event channel.
    pub fn notify(&self, message: impl Into<String>, level: NotificationLevel) {
        let _ = self
            .event_tx
            .send(AppEvent::Notification(Notification::new(message, level)));
    }

    /// Existing category names, for the add-book form.
    pub fn category_names(&self) -> Vec<String> {
        self.library
            .categories()
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    /// Persist the library, reporting failure as a notification.
    pub fn save_library(&self) -> bool {
        match self.library.save() {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save library: {e}");
                self.notify(format!("Could not save library: {e}"), NotificationLevel::Error);
                false
            }
        }
    }
}

#[cfg(test)]
impl Services {
    /// In-memory services around `lookup`, for view tests.
    pub fn for_test(lookup: Arc<dyn BookLookup>) -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let services = Self {
            lookup,
            library: Library::in_memory(),
            policy: AutofillPolicy::default(),
            shelf_order: BookOrder::default(),
            event_tx,
        };
        (services, event_rx)
    }
}
