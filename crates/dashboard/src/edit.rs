//! Product edit controller.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::{instrument, warn};

use painel_app::domain::products::{
    form::{ProductForm, ProductFormErrors, validate_product_update},
    records::{ProductRecord, ProductUuid},
};

use crate::{
    errors::CatalogError, notifications::Notifier, repository::CatalogRepository, routes::Route,
    session::SessionStore,
};

/// Lifecycle of the edit screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditPhase {
    #[default]
    Loading,
    Ready,
    Saving,
    /// Loading failed with a retryable error.
    Failed,
    /// The view is done; see [`EditController::take_navigation`].
    Closed,
}

#[derive(Debug, Default)]
struct EditView {
    phase: EditPhase,
    record: Option<ProductRecord>,
    form: ProductForm,
    errors: Option<ProductFormErrors>,
    navigation: Option<Route>,
    generation: u64,
}

/// Edit screen for a single product, keyed by its id.
pub struct EditController {
    id: ProductUuid,
    repository: Arc<dyn CatalogRepository>,
    sessions: Arc<SessionStore>,
    notifier: Notifier,
    view: Mutex<EditView>,
}

impl fmt::Debug for EditController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditController")
            .field("id", &self.id)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl EditController {
    #[must_use]
    pub fn new(
        id: ProductUuid,
        repository: Arc<dyn CatalogRepository>,
        sessions: Arc<SessionStore>,
        notifier: Notifier,
    ) -> Self {
        Self {
            id,
            repository,
            sessions,
            notifier,
            view: Mutex::new(EditView::default()),
        }
    }

    fn view(&self) -> MutexGuard<'_, EditView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn id(&self) -> ProductUuid {
        self.id
    }

    pub fn phase(&self) -> EditPhase {
        self.view().phase
    }

    /// The record as last loaded or saved.
    pub fn record(&self) -> Option<ProductRecord> {
        self.view().record.clone()
    }

    pub fn form(&self) -> ProductForm {
        self.view().form.clone()
    }

    /// Apply an edit to the form fields.
    pub fn edit_form(&self, edit: impl FnOnce(&mut ProductForm)) {
        edit(&mut self.view().form);
    }

    /// Field errors from the last rejected save.
    pub fn errors(&self) -> Option<ProductFormErrors> {
        self.view().errors.clone()
    }

    /// Where the view asked to go, if anywhere. Cleared once read.
    pub fn take_navigation(&self) -> Option<Route> {
        self.view().navigation.take()
    }

    /// Start a new request, superseding any still in flight.
    fn begin(&self, phase: EditPhase) -> u64 {
        let mut view = self.view();

        view.generation += 1;
        view.phase = phase;

        view.generation
    }

    /// The view for `generation`, or `None` once a later request or a
    /// cancel has superseded it.
    fn current(&self, generation: u64) -> Option<MutexGuard<'_, EditView>> {
        let view = self.view();

        (view.generation == generation).then_some(view)
    }

    /// Fetch the product and pre-populate the form from it.
    ///
    /// A missing product closes the view and navigates back to the list. A
    /// response arriving after [`Self::cancel`] is returned but not applied.
    ///
    /// # Errors
    ///
    /// Returns the repository's error, or [`CatalogError::Auth`] when nobody
    /// is signed in.
    #[instrument(skip(self), fields(product_uuid = %self.id))]
    pub async fn load(&self) -> Result<ProductRecord, CatalogError> {
        let generation = self.begin(EditPhase::Loading);

        let Some(session) = self.sessions.resolved_session().await else {
            if let Some(mut view) = self.current(generation) {
                view.phase = EditPhase::Closed;
            }

            return Err(CatalogError::Auth);
        };

        let result = self.repository.get(&session, self.id).await;

        {
            let Some(mut view) = self.current(generation) else {
                return result;
            };

            match &result {
                Ok(record) => {
                    view.form = ProductForm::from(record);
                    view.record = Some(record.clone());
                    view.errors = None;
                    view.phase = EditPhase::Ready;
                }
                Err(CatalogError::Repository(_)) => view.phase = EditPhase::Failed,
                Err(_) => view.phase = EditPhase::Closed,
            }
        }

        if let Err(error) = &result {
            self.fail(error).await;
        }

        result
    }

    /// Validate the form and replace the product with it. On success the
    /// view closes and navigates back to the list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] for rejected fields (nothing is
    /// sent), [`CatalogError::Busy`] unless the form is ready, and the
    /// repository's error otherwise.
    #[instrument(skip(self), fields(product_uuid = %self.id))]
    pub async fn save(&self) -> Result<ProductRecord, CatalogError> {
        let (payload, generation) = {
            let mut view = self.view();

            if view.phase != EditPhase::Ready {
                return Err(CatalogError::Busy);
            }

            match validate_product_update(&view.form) {
                Ok(payload) => {
                    view.errors = None;
                    view.generation += 1;
                    view.phase = EditPhase::Saving;

                    (payload, view.generation)
                }
                Err(errors) => {
                    view.errors = Some(errors.clone());

                    return Err(CatalogError::Validation(errors));
                }
            }
        };

        let Some(session) = self.sessions.resolved_session().await else {
            if let Some(mut view) = self.current(generation) {
                view.phase = EditPhase::Closed;
            }

            return Err(CatalogError::Auth);
        };

        let result = self.repository.update(&session, self.id, payload).await;

        {
            let Some(mut view) = self.current(generation) else {
                return result;
            };

            match &result {
                Ok(record) => {
                    view.form = ProductForm::from(record);
                    view.record = Some(record.clone());
                    view.phase = EditPhase::Closed;
                    view.navigation = Some(Route::Products);
                }
                Err(error) => {
                    view.phase = match error {
                        CatalogError::NotFound | CatalogError::Auth => EditPhase::Closed,
                        _ => EditPhase::Ready,
                    };

                    if let CatalogError::Validation(errors) = error {
                        view.errors = Some(errors.clone());
                    }
                }
            }
        }

        match &result {
            Ok(record) => self
                .notifier
                .success(format!("Product \"{}\" saved", record.name)),
            Err(error) => self.fail(error).await,
        }

        result
    }

    /// Abandon the edit and go back to the list. Responses still in flight
    /// are discarded.
    pub fn cancel(&self) {
        let mut view = self.view();

        view.generation += 1;
        view.phase = EditPhase::Closed;
        view.navigation = Some(Route::Products);
    }

    async fn fail(&self, error: &CatalogError) {
        match error {
            CatalogError::NotFound => {
                self.view().navigation = Some(Route::Products);
                self.notifier.error("Product not found");
            }
            CatalogError::Auth => {
                self.sessions.sign_out().await;
                self.notifier
                    .error("Your session has expired. Sign in again to continue.");
            }
            CatalogError::Repository(message) => {
                warn!("product request failed: {message}");

                self.notifier
                    .error("Something went wrong. Please try again.");
            }
            CatalogError::Validation(_) | CatalogError::Busy => {}
        }
    }
}
