//! Product list controller.
//!
//! Owns the state behind the products screen: the fetched list, the search
//! and status filter, the create form and every in-flight mutation. Each
//! mutation completes before the list is fetched again, and list responses
//! are tagged with a generation so only the latest request is applied.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use rustc_hash::FxHashSet;
use tracing::{debug, instrument, warn};

use painel_app::domain::products::{
    form::{ProductForm, ProductFormErrors, validate_new_product},
    records::{ProductRecord, ProductStatus, ProductUuid},
};

use crate::{
    errors::CatalogError,
    notifications::Notifier,
    repository::CatalogRepository,
    session::{Session, SessionStore},
};

/// Progress of the product list request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ListState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// The last request failed. Previously fetched products, if any, are
    /// still shown and marked stale.
    Failed(CatalogError),
}

/// Client-side narrowing of the fetched products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Case-insensitive name substring; blank matches everything.
    pub search: String,
    pub status: Option<ProductStatus>,
}

/// How a list re-fetch ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Refreshed,
    /// A newer request was issued, or the view unmounted, before this one
    /// returned.
    Discarded,
    Failed(CatalogError),
}

/// A mutation that reached the repository, and what happened to the list
/// fetch that followed it.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome<T> {
    pub value: T,
    pub refresh: RefreshOutcome,
}

impl<T> MutationOutcome<T> {
    /// The mutation succeeded but the list could not be fetched again.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        matches!(self.refresh, RefreshOutcome::Failed(_))
    }
}

#[derive(Debug, Default)]
struct CatalogView {
    list: ListState,
    products: Vec<ProductRecord>,
    stale: bool,
    filter: CatalogFilter,
    deleting: FxHashSet<ProductUuid>,
    creating: bool,
    create_open: bool,
    create_form: ProductForm,
    create_errors: Option<ProductFormErrors>,
    mounted: bool,
    generation: u64,
}

/// Keep the products matching both the name search and the status filter.
#[must_use]
pub fn filter_products(products: &[ProductRecord], filter: &CatalogFilter) -> Vec<ProductRecord> {
    let needle = filter.search.trim().to_lowercase();

    products
        .iter()
        .filter(|product| needle.is_empty() || product.name.to_lowercase().contains(&needle))
        .filter(|product| filter.status.is_none_or(|status| product.status == status))
        .cloned()
        .collect()
}

/// Product list screen: the cached catalog, its filter, and the create and
/// delete mutations that keep it current.
pub struct CatalogController {
    repository: Arc<dyn CatalogRepository>,
    sessions: Arc<SessionStore>,
    notifier: Notifier,
    view: Mutex<CatalogView>,
}

impl fmt::Debug for CatalogController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogController")
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl CatalogController {
    #[must_use]
    pub fn new(
        repository: Arc<dyn CatalogRepository>,
        sessions: Arc<SessionStore>,
        notifier: Notifier,
    ) -> Self {
        Self {
            repository,
            sessions,
            notifier,
            view: Mutex::new(CatalogView::default()),
        }
    }

    fn view(&self) -> MutexGuard<'_, CatalogView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Show the screen and fetch the list.
    pub async fn mount(&self) -> RefreshOutcome {
        self.view().mounted = true;

        self.refresh().await
    }

    /// Leave the screen. Responses still in flight are discarded.
    pub fn unmount(&self) {
        let mut view = self.view();

        view.mounted = false;
        view.generation += 1;
    }

    /// Fetch the list again. Only the most recent request is applied.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> RefreshOutcome {
        let session = match self.require_session().await {
            Ok(session) => session,
            Err(error) => return RefreshOutcome::Failed(error),
        };

        let generation = {
            let mut view = self.view();

            if !view.mounted {
                return RefreshOutcome::Discarded;
            }

            view.generation += 1;
            view.list = ListState::Loading;
            view.generation
        };

        let result = self.repository.list(&session).await;

        let outcome = {
            let mut view = self.view();

            if !view.mounted || view.generation != generation {
                debug!(generation, current = view.generation, "discarding stale list");

                return RefreshOutcome::Discarded;
            }

            match result {
                Ok(products) => {
                    view.products = products;
                    view.stale = false;
                    view.list = ListState::Loaded;

                    RefreshOutcome::Refreshed
                }
                Err(error) => {
                    view.stale = !view.products.is_empty();
                    view.list = ListState::Failed(error.clone());

                    RefreshOutcome::Failed(error)
                }
            }
        };

        if let RefreshOutcome::Failed(error) = &outcome {
            self.report(error).await;
        }

        outcome
    }

    pub fn list_state(&self) -> ListState {
        self.view().list.clone()
    }

    /// Whether the shown products predate a failed re-fetch.
    pub fn is_stale(&self) -> bool {
        self.view().stale
    }

    /// Every fetched product, unfiltered.
    pub fn products(&self) -> Vec<ProductRecord> {
        self.view().products.clone()
    }

    /// The fetched products narrowed by the current filter.
    pub fn visible(&self) -> Vec<ProductRecord> {
        let view = self.view();

        filter_products(&view.products, &view.filter)
    }

    pub fn filter(&self) -> CatalogFilter {
        self.view().filter.clone()
    }

    pub fn set_search(&self, search: impl Into<String>) {
        self.view().filter.search = search.into();
    }

    pub fn set_status_filter(&self, status: Option<ProductStatus>) {
        self.view().filter.status = status;
    }

    pub fn is_deleting(&self, id: ProductUuid) -> bool {
        self.view().deleting.contains(&id)
    }

    pub fn is_creating(&self) -> bool {
        self.view().creating
    }

    pub fn open_create_form(&self) {
        let mut view = self.view();

        view.create_open = true;
        view.create_errors = None;
    }

    pub fn close_create_form(&self) {
        let mut view = self.view();

        view.create_open = false;
        view.create_form = ProductForm::default();
        view.create_errors = None;
    }

    pub fn is_create_form_open(&self) -> bool {
        self.view().create_open
    }

    pub fn create_form(&self) -> ProductForm {
        self.view().create_form.clone()
    }

    /// Field errors from the last rejected create.
    pub fn create_errors(&self) -> Option<ProductFormErrors> {
        self.view().create_errors.clone()
    }

    /// Validate and submit a new product, then fetch the list again.
    ///
    /// Invalid input never reaches the repository. On success the create
    /// form is closed and cleared.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] for rejected fields,
    /// [`CatalogError::Busy`] while another create is in flight, and the
    /// repository's error otherwise.
    #[instrument(skip_all)]
    pub async fn create(
        &self,
        form: ProductForm,
    ) -> Result<MutationOutcome<ProductRecord>, CatalogError> {
        let validated = validate_new_product(&form);

        {
            let mut view = self.view();

            view.create_form = form;

            match &validated {
                Ok(_) => view.create_errors = None,
                Err(errors) => view.create_errors = Some(errors.clone()),
            }
        }

        let payload = validated.map_err(CatalogError::Validation)?;
        let session = self.require_session().await?;

        {
            let mut view = self.view();

            if view.creating {
                return Err(CatalogError::Busy);
            }

            view.creating = true;
        }

        let result = self.repository.create(&session, payload).await;

        self.view().creating = false;

        let record = match result {
            Ok(record) => record,
            Err(error) => {
                if let CatalogError::Validation(errors) = &error {
                    self.view().create_errors = Some(errors.clone());
                }

                self.report(&error).await;

                return Err(error);
            }
        };

        self.close_create_form();
        self.notifier
            .success(format!("Product \"{}\" created", record.name));

        let refresh = self.refresh().await;

        Ok(MutationOutcome {
            value: record,
            refresh,
        })
    }

    /// Delete a product, then fetch the list again. The product stays
    /// listed if the delete fails.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Busy`] if a delete for `id` is already in
    /// flight, and the repository's error otherwise.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductUuid) -> Result<MutationOutcome<()>, CatalogError> {
        let session = self.require_session().await?;

        if !self.view().deleting.insert(id) {
            return Err(CatalogError::Busy);
        }

        let result = self.repository.delete(&session, id).await;

        self.view().deleting.remove(&id);

        if let Err(error) = result {
            self.report(&error).await;

            return Err(error);
        }

        self.notifier.success("Product deleted");

        let refresh = self.refresh().await;

        Ok(MutationOutcome { value: (), refresh })
    }

    /// Waits for the store to resolve. An anonymous store is reported as
    /// [`CatalogError::Auth`] without signing out; only a repository
    /// rejection ends the session.
    async fn require_session(&self) -> Result<Session, CatalogError> {
        self.sessions
            .resolved_session()
            .await
            .ok_or(CatalogError::Auth)
    }

    async fn report(&self, error: &CatalogError) {
        match error {
            CatalogError::Auth => {
                self.sessions.sign_out().await;
                self.notifier
                    .error("Your session has expired. Sign in again to continue.");
            }
            CatalogError::NotFound => self.notifier.error("Product not found"),
            CatalogError::Repository(message) => {
                warn!("catalog request failed: {message}");

                self.notifier
                    .error("Something went wrong. Please try again.");
            }
            CatalogError::Validation(_) | CatalogError::Busy => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use painel_app::domain::products::{
        data::{NewProduct, ProductUpdate},
        form::ProductField,
    };
    use testresult::TestResult;
    use tokio::sync::{Notify, mpsc};

    use crate::{
        credentials::{CredentialStore, MemoryCredentialStore},
        identity::MockIdentityProvider,
        notifications::{self, Notification, NotificationKind},
        repository::MockCatalogRepository,
        session::SessionState,
        test_helpers::{FakeCatalog, make_product, make_session, signed_in_store},
    };

    use super::*;

    fn curso_form() -> ProductForm {
        ProductForm {
            name: "Curso X".to_string(),
            product_type: "curso-online".to_string(),
            price: "R$ 100,00".to_string(),
            payment_type: "unico".to_string(),
            ..ProductForm::default()
        }
    }

    async fn controller(
        repository: Arc<dyn CatalogRepository>,
    ) -> (
        CatalogController,
        Arc<SessionStore>,
        mpsc::UnboundedReceiver<Notification>,
    ) {
        let sessions = signed_in_store().await;
        let (notifier, receiver) = notifications::channel();

        (
            CatalogController::new(repository, Arc::clone(&sessions), notifier),
            sessions,
            receiver,
        )
    }

    #[test]
    fn filter_matches_name_and_status() {
        let products = vec![
            make_product(ProductUuid::new(), "Curso de Rust", ProductStatus::Ativo),
            make_product(ProductUuid::new(), "Mentoria RUST", ProductStatus::Inativo),
            make_product(ProductUuid::new(), "Evento", ProductStatus::Ativo),
        ];

        let by_name = filter_products(
            &products,
            &CatalogFilter {
                search: "rust".to_string(),
                status: None,
            },
        );

        assert_eq!(by_name.len(), 2, "search is case-insensitive");

        let by_both = filter_products(
            &products,
            &CatalogFilter {
                search: "rust".to_string(),
                status: Some(ProductStatus::Ativo),
            },
        );

        assert_eq!(by_both.len(), 1);
        assert_eq!(by_both.first().map(|p| p.name.as_str()), Some("Curso de Rust"));

        assert_eq!(filter_products(&products, &CatalogFilter::default()).len(), 3);
    }

    #[tokio::test]
    async fn mount_lists_the_catalog() -> TestResult {
        let (controller, _sessions, _notifications) = controller(Arc::new(FakeCatalog::default())).await;

        assert_eq!(controller.list_state(), ListState::Idle);
        assert_eq!(controller.mount().await, RefreshOutcome::Refreshed);
        assert_eq!(controller.list_state(), ListState::Loaded);
        assert!(controller.products().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn create_then_list_contains_one_record() -> TestResult {
        let (controller, _sessions, mut inbox) =
            controller(Arc::new(FakeCatalog::default())).await;

        controller.mount().await;
        controller.open_create_form();

        let outcome = controller.create(curso_form()).await?;

        assert_eq!(outcome.refresh, RefreshOutcome::Refreshed);
        assert_eq!(outcome.value.price, 10_000);
        assert_eq!(outcome.value.status, ProductStatus::Ativo);

        let products = controller.products();

        assert_eq!(products.len(), 1);
        assert_eq!(products.first().map(|p| p.uuid), Some(outcome.value.uuid));

        assert!(!controller.is_create_form_open(), "form closes on success");
        assert_eq!(controller.create_form(), ProductForm::default());

        let sent = notifications::drain(&mut inbox);

        assert_eq!(sent.len(), 1);
        assert!(sent.iter().all(|n| n.kind == NotificationKind::Success));

        Ok(())
    }

    #[tokio::test]
    async fn invalid_price_never_reaches_the_repository() -> TestResult {
        // No expectations: any repository call fails the test.
        let (controller, _sessions, _notifications) =
            controller(Arc::new(MockCatalogRepository::new())).await;

        controller.open_create_form();

        let form = ProductForm {
            price: "abc".to_string(),
            ..curso_form()
        };

        let result = controller.create(form).await;

        let Err(CatalogError::Validation(errors)) = result else {
            return Err(format!("expected a validation error, got {result:?}").into());
        };

        assert!(errors.contains(&ProductField::Price));
        assert!(controller.is_create_form_open(), "form stays open");
        assert_eq!(controller.create_form().price, "abc");
        assert!(
            controller
                .create_errors()
                .is_some_and(|errors| errors.contains(&ProductField::Price))
        );

        Ok(())
    }

    #[tokio::test]
    async fn second_delete_is_not_found() -> TestResult {
        let (controller, _sessions, _notifications) =
            controller(Arc::new(FakeCatalog::default())).await;

        controller.mount().await;

        let created = controller.create(curso_form()).await?.value;

        controller.delete(created.uuid).await?;

        assert!(controller.products().is_empty());
        assert_eq!(
            controller.delete(created.uuid).await,
            Err(CatalogError::NotFound)
        );
        assert!(!controller.is_deleting(created.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_product_listed() -> TestResult {
        let product = make_product(ProductUuid::new(), "Curso X", ProductStatus::Ativo);
        let listed = product.clone();

        let mut repository = MockCatalogRepository::new();

        repository
            .expect_list()
            .times(1)
            .returning(move |_| Ok(vec![listed.clone()]));
        repository
            .expect_delete()
            .times(1)
            .returning(|_, _| Err(CatalogError::Repository("connection reset".to_string())));

        let (controller, _sessions, mut inbox) = controller(Arc::new(repository)).await;

        controller.mount().await;

        let result = controller.delete(product.uuid).await;

        assert!(matches!(result, Err(CatalogError::Repository(_))));
        assert_eq!(controller.products().len(), 1);
        assert!(!controller.is_deleting(product.uuid));

        let sent = notifications::drain(&mut inbox);

        assert!(sent.iter().any(|n| n.kind == NotificationKind::Error));

        Ok(())
    }

    /// Lists whose second call waits until released.
    #[derive(Debug, Default)]
    struct GatedCatalog {
        calls: AtomicUsize,
        gate: Notify,
    }

    #[async_trait]
    impl CatalogRepository for GatedCatalog {
        async fn list(&self, _session: &Session) -> Result<Vec<ProductRecord>, CatalogError> {
            match self.calls.fetch_add(1, Ordering::SeqCst) {
                1 => {
                    self.gate.notified().await;

                    Ok(vec![make_product(ProductUuid::new(), "Old", ProductStatus::Ativo)])
                }
                _ => Ok(vec![make_product(ProductUuid::new(), "New", ProductStatus::Ativo)]),
            }
        }

        async fn get(&self, _: &Session, _: ProductUuid) -> Result<ProductRecord, CatalogError> {
            Err(CatalogError::NotFound)
        }

        async fn create(&self, _: &Session, _: NewProduct) -> Result<ProductRecord, CatalogError> {
            Err(CatalogError::Busy)
        }

        async fn update(
            &self,
            _: &Session,
            _: ProductUuid,
            _: ProductUpdate,
        ) -> Result<ProductRecord, CatalogError> {
            Err(CatalogError::Busy)
        }

        async fn delete(&self, _: &Session, _: ProductUuid) -> Result<(), CatalogError> {
            Err(CatalogError::Busy)
        }
    }

    #[tokio::test]
    async fn superseded_list_response_is_discarded() -> TestResult {
        let repository = Arc::new(GatedCatalog::default());
        let (controller, _sessions, _notifications) =
            controller(Arc::clone(&repository) as Arc<dyn CatalogRepository>).await;

        controller.mount().await;

        let (first, second) = tokio::join!(controller.refresh(), async {
            let outcome = controller.refresh().await;

            repository.gate.notify_one();

            outcome
        });

        assert_eq!(first, RefreshOutcome::Discarded);
        assert_eq!(second, RefreshOutcome::Refreshed);

        let names: Vec<_> = controller.products().into_iter().map(|p| p.name).collect();

        assert_eq!(names, vec!["New".to_string()]);
        assert_eq!(controller.list_state(), ListState::Loaded);

        Ok(())
    }

    #[tokio::test]
    async fn unmounted_view_ignores_refresh() -> TestResult {
        let (controller, _sessions, _notifications) =
            controller(Arc::new(MockCatalogRepository::new())).await;

        assert_eq!(controller.refresh().await, RefreshOutcome::Discarded);

        Ok(())
    }

    #[tokio::test]
    async fn failed_refresh_after_create_is_partial_success() -> TestResult {
        let existing = make_product(ProductUuid::new(), "Existing", ProductStatus::Ativo);
        let created = make_product(ProductUuid::new(), "Curso X", ProductStatus::Ativo);
        let calls = AtomicUsize::new(0);

        let mut repository = MockCatalogRepository::new();

        repository.expect_list().times(2).returning(move |_| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(vec![existing.clone()])
            } else {
                Err(CatalogError::Repository("timeout".to_string()))
            }
        });
        repository
            .expect_create()
            .times(1)
            .returning(move |_, _| Ok(created.clone()));

        let (controller, _sessions, mut inbox) = controller(Arc::new(repository)).await;

        controller.mount().await;

        let outcome = controller.create(curso_form()).await?;

        assert!(outcome.is_partial());
        assert!(controller.is_stale(), "previous list stays, marked stale");
        assert_eq!(controller.products().len(), 1);
        assert!(matches!(controller.list_state(), ListState::Failed(_)));

        let kinds: Vec<_> = notifications::drain(&mut inbox)
            .into_iter()
            .map(|n| n.kind)
            .collect();

        assert_eq!(kinds, vec![NotificationKind::Success, NotificationKind::Error]);

        Ok(())
    }

    #[tokio::test]
    async fn expired_session_signs_out() -> TestResult {
        let catalog = Arc::new(FakeCatalog::default());
        let (controller, sessions, mut inbox) =
            controller(Arc::clone(&catalog) as Arc<dyn CatalogRepository>).await;

        controller.mount().await;
        catalog.expire_sessions();

        assert_eq!(controller.create(curso_form()).await, Err(CatalogError::Auth));
        assert_eq!(sessions.state().await, SessionState::Anonymous);
        assert!(!controller.is_creating());

        let sent = notifications::drain(&mut inbox);

        assert!(sent.iter().any(|n| n.kind == NotificationKind::Error));

        Ok(())
    }

    #[tokio::test]
    async fn unresolved_store_is_restored_before_listing() -> TestResult {
        let stored = MemoryCredentialStore::with_session(make_session());

        let mut identity = MockIdentityProvider::new();

        identity
            .expect_get_session()
            .times(1)
            .returning(|_| Ok(make_session()));

        let sessions = Arc::new(SessionStore::new(
            Arc::new(identity),
            Arc::new(stored.clone()),
        ));
        let (notifier, mut inbox) = notifications::channel();
        let controller = CatalogController::new(
            Arc::new(FakeCatalog::default()),
            Arc::clone(&sessions),
            notifier,
        );

        assert_eq!(sessions.state().await, SessionState::Unresolved);
        assert_eq!(controller.mount().await, RefreshOutcome::Refreshed);
        assert!(matches!(
            sessions.state().await,
            SessionState::Authenticated(_)
        ));
        assert!(stored.load().await?.is_some(), "stored session is kept");
        assert!(notifications::drain(&mut inbox).is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn anonymous_store_fails_without_signing_out() -> TestResult {
        let sessions = Arc::new(SessionStore::new(
            Arc::new(MockIdentityProvider::new()),
            Arc::new(MemoryCredentialStore::default()),
        ));

        let mut repository = MockCatalogRepository::new();

        repository.expect_list().never();
        repository.expect_delete().never();

        let (notifier, mut inbox) = notifications::channel();
        let controller =
            CatalogController::new(Arc::new(repository), Arc::clone(&sessions), notifier);

        assert_eq!(
            controller.mount().await,
            RefreshOutcome::Failed(CatalogError::Auth)
        );
        assert_eq!(
            controller.delete(ProductUuid::new()).await,
            Err(CatalogError::Auth)
        );
        assert_eq!(sessions.state().await, SessionState::Anonymous);
        assert!(notifications::drain(&mut inbox).is_empty());

        Ok(())
    }

    /// Creates and deletes that wait until released.
    #[derive(Debug, Default)]
    struct SlowMutations {
        creates: AtomicUsize,
        deletes: AtomicUsize,
        gate: Notify,
    }

    #[async_trait]
    impl CatalogRepository for SlowMutations {
        async fn list(&self, _session: &Session) -> Result<Vec<ProductRecord>, CatalogError> {
            Ok(Vec::new())
        }

        async fn get(&self, _: &Session, _: ProductUuid) -> Result<ProductRecord, CatalogError> {
            Err(CatalogError::NotFound)
        }

        async fn create(&self, _: &Session, _: NewProduct) -> Result<ProductRecord, CatalogError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;

            Ok(make_product(ProductUuid::new(), "Curso X", ProductStatus::Ativo))
        }

        async fn update(
            &self,
            _: &Session,
            _: ProductUuid,
            _: ProductUpdate,
        ) -> Result<ProductRecord, CatalogError> {
            Err(CatalogError::Busy)
        }

        async fn delete(&self, _: &Session, _: ProductUuid) -> Result<(), CatalogError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;

            Ok(())
        }
    }

    #[tokio::test]
    async fn overlapping_delete_is_busy() -> TestResult {
        let repository = Arc::new(SlowMutations::default());
        let (controller, _sessions, _notifications) =
            controller(Arc::clone(&repository) as Arc<dyn CatalogRepository>).await;
        let id = ProductUuid::new();

        controller.mount().await;

        let (first, second) = tokio::join!(controller.delete(id), async {
            let second = controller.delete(id).await;

            repository.gate.notify_one();

            second
        });

        assert!(first.is_ok());
        assert_eq!(second, Err(CatalogError::Busy));
        assert_eq!(repository.deletes.load(Ordering::SeqCst), 1);
        assert!(!controller.is_deleting(id));

        Ok(())
    }

    #[tokio::test]
    async fn overlapping_create_is_busy() -> TestResult {
        let repository = Arc::new(SlowMutations::default());
        let (controller, _sessions, _notifications) =
            controller(Arc::clone(&repository) as Arc<dyn CatalogRepository>).await;

        controller.mount().await;

        let (first, second) = tokio::join!(controller.create(curso_form()), async {
            let second = controller.create(curso_form()).await;

            repository.gate.notify_one();

            second
        });

        assert!(first.is_ok());
        assert_eq!(second, Err(CatalogError::Busy));
        assert_eq!(repository.creates.load(Ordering::SeqCst), 1);
        assert!(!controller.is_creating());

        Ok(())
    }
}
