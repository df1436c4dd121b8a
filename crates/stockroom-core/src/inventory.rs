// ── Inventory controller ──
//
// Owns the equipment collection and every piece of view-shaping state:
// filters, sort, page, selection, modal. Mutations go to the backend and
// are followed by a full re-fetch; nothing is patched locally.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use stockroom_api::{ApiClient, CreateEquipmentRequest, EquipmentQuery, UpdateEquipmentRequest};

use crate::config::DEFAULT_ITEMS_PER_PAGE;
use crate::debounce::Debouncer;
use crate::error::CoreError;
use crate::model::{
    Equipment, EquipmentDraft, EquipmentId, EquipmentPatch, FieldErrors, FilterConfig,
    FilterUpdate, ModalMode, SortConfig, SortDirection, SortKey,
};
use crate::session::SessionController;
use crate::view::InventoryView;

const NOTICE_CHANNEL_SIZE: usize = 64;

// ── State ────────────────────────────────────────────────────────

/// Observable inventory snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryState {
    pub items: Vec<Equipment>,
    pub loading: bool,
    pub error: Option<String>,
    /// Messages from the last rejected form submission.
    pub field_errors: FieldErrors,
    pub selected_item: Option<Equipment>,
    pub is_modal_open: bool,
    pub modal_mode: ModalMode,
    pub filters: FilterConfig,
    pub sort: SortConfig,
    /// 1-based.
    pub current_page: usize,
    pub items_per_page: usize,
}

impl Default for InventoryState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            field_errors: FieldErrors::default(),
            selected_item: None,
            is_modal_open: false,
            modal_mode: ModalMode::Create,
            filters: FilterConfig::default(),
            sort: SortConfig::default(),
            current_page: 1,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

// ── Notices ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient outcome message for a write operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn success(message: &str) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.to_owned(),
        }
    }

    fn error(message: &str) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.to_owned(),
        }
    }
}

pub const CREATED_MESSAGE: &str = "Equipment created successfully";
pub const CREATE_FAILED_MESSAGE: &str = "Failed to create equipment";
pub const UPDATED_MESSAGE: &str = "Equipment updated successfully";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update equipment";
pub const DELETED_MESSAGE: &str = "Equipment deleted successfully";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete equipment";

// ── InventoryController ──────────────────────────────────────────

/// Cheaply cloneable handle to the inventory view state.
#[derive(Clone)]
pub struct InventoryController {
    inner: Arc<InventoryInner>,
}

struct InventoryInner {
    client: Arc<ApiClient>,
    session: SessionController,
    state: watch::Sender<InventoryState>,
    notices: broadcast::Sender<Notice>,
    search: Debouncer,
}

impl InventoryController {
    pub fn new(
        client: Arc<ApiClient>,
        session: SessionController,
        items_per_page: usize,
        search_debounce: std::time::Duration,
    ) -> Self {
        let (state, _) = watch::channel(InventoryState {
            items_per_page: items_per_page.max(1),
            ..InventoryState::default()
        });
        let (notices, _) = broadcast::channel(NOTICE_CHANNEL_SIZE);
        Self {
            inner: Arc::new(InventoryInner {
                client,
                session,
                state,
                notices,
                search: Debouncer::new(search_debounce),
            }),
        }
    }

    // ── Observation ──────────────────────────────────────────────

    pub fn subscribe(&self) -> watch::Receiver<InventoryState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> InventoryState {
        self.inner.state.borrow().clone()
    }

    /// Sorted, paginated projection of the current state.
    pub fn view(&self) -> InventoryView {
        InventoryView::compute(&self.inner.state.borrow())
    }

    /// Success and error notices for write operations.
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notices.subscribe()
    }

    pub fn is_search_pending(&self) -> bool {
        self.inner.search.is_pending()
    }

    // ── Fetching ─────────────────────────────────────────────────

    /// Replace the collection with the backend's answer for the current
    /// filters. On failure the previous collection is kept.
    pub async fn fetch_items(&self) -> Result<(), CoreError> {
        let query = EquipmentQuery::from(&self.inner.state.borrow().filters);
        self.inner.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        debug!(?query, "fetching equipment");
        match self.inner.client.list_equipment(&query).await {
            Ok(raw) => {
                let items: Vec<Equipment> = raw.into_iter().map(Equipment::from).collect();
                debug!(count = items.len(), "equipment fetched");
                self.inner.state.send_modify(|s| {
                    s.items = items;
                    s.loading = false;
                });
                Ok(())
            }
            Err(e) => Err(self.record_failure(e)),
        }
    }

    /// Fetch one record without touching the collection.
    pub async fn get_item(&self, id: &EquipmentId) -> Result<Equipment, CoreError> {
        match self.inner.client.get_equipment(id.as_str()).await {
            Ok(raw) => Ok(Equipment::from(raw)),
            Err(e) => {
                let err = CoreError::from(e);
                if err.is_session_expired() {
                    self.inner.session.expire();
                }
                Err(err)
            }
        }
    }

    // ── Filters ──────────────────────────────────────────────────

    /// Replace the structured filters, jump to page 1 and re-fetch.
    pub async fn set_filters(&self, update: FilterUpdate) -> Result<(), CoreError> {
        self.inner.state.send_modify(|s| {
            s.filters.apply(update);
            s.current_page = 1;
        });
        self.fetch_items().await
    }

    /// Replace only the search text.
    pub async fn set_search(&self, text: impl Into<String>) -> Result<(), CoreError> {
        let mut update = FilterUpdate::from(&self.inner.state.borrow().filters);
        update.search = Some(text.into());
        self.set_filters(update).await
    }

    /// Debounced [`set_search`](Self::set_search): only the last text typed
    /// within the quiet period is sent.
    ///
    /// The pending task holds only a weak handle, so dropping the last
    /// controller also drops the waiting search.
    pub fn schedule_search(&self, text: impl Into<String>) {
        let weak = Arc::downgrade(&self.inner);
        let text = text.into();
        self.inner.search.schedule(async move {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let this = InventoryController { inner };
            if let Err(e) = this.set_search(text).await {
                debug!(error = %e, "debounced search failed");
            }
        });
    }

    /// Drop every filter including search, jump to page 1 and re-fetch.
    pub async fn clear_filters(&self) -> Result<(), CoreError> {
        self.inner.search.cancel();
        self.inner.state.send_modify(|s| {
            s.filters = FilterConfig::default();
            s.current_page = 1;
        });
        self.fetch_items().await
    }

    // ── Client-side view state ───────────────────────────────────

    /// Change the client-side ordering.
    pub fn set_sort_config(&self, key: SortKey, direction: SortDirection) {
        // Sorting never resets the page.
        self.inner.state.send_modify(|s| {
            s.sort = SortConfig { key, direction };
        });
    }

    /// Jump to `page`. Out-of-range pages render as empty.
    pub fn set_page(&self, page: usize) {
        self.inner.state.send_modify(|s| s.current_page = page);
    }

    pub fn select_item(&self, item: Option<Equipment>) {
        self.inner.state.send_modify(|s| s.selected_item = item);
    }

    pub fn open_create_modal(&self) {
        self.open_modal(ModalMode::Create, None);
    }

    pub fn open_edit_modal(&self, item: Equipment) {
        self.open_modal(ModalMode::Edit, Some(item));
    }

    pub fn open_view_modal(&self, item: Equipment) {
        self.open_modal(ModalMode::View, Some(item));
    }

    /// Hide the modal. Mode and selection are kept.
    pub fn close_modal(&self) {
        self.inner.state.send_modify(|s| s.is_modal_open = false);
    }

    pub fn clear_error(&self) {
        self.inner.state.send_if_modified(|s| s.error.take().is_some());
    }

    fn open_modal(&self, mode: ModalMode, item: Option<Equipment>) {
        self.inner.state.send_modify(|s| {
            s.is_modal_open = true;
            s.modal_mode = mode;
            s.selected_item = item;
            s.field_errors = FieldErrors::default();
        });
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Validate and create a record, then re-fetch and close the modal.
    pub async fn create_item(&self, draft: &EquipmentDraft) -> Result<Equipment, CoreError> {
        self.check(draft.validate())?;
        self.begin_write();

        let body = CreateEquipmentRequest::from(draft);
        match self.inner.client.create_equipment(&body).await {
            Ok(raw) => {
                let created = Equipment::from(raw);
                info!(id = %created.id, name = %created.name, "equipment created");
                self.finish_write(true, CREATED_MESSAGE).await;
                Ok(created)
            }
            Err(e) => Err(self.fail_write(e, CREATE_FAILED_MESSAGE)),
        }
    }

    /// Validate the present fields and apply a partial update, then
    /// re-fetch and close the modal.
    pub async fn update_item(
        &self,
        id: &EquipmentId,
        patch: &EquipmentPatch,
    ) -> Result<Equipment, CoreError> {
        self.check(patch.validate())?;
        self.begin_write();

        let body = UpdateEquipmentRequest::from(patch);
        match self.inner.client.update_equipment(id.as_str(), &body).await {
            Ok(raw) => {
                let updated = Equipment::from(raw);
                info!(%id, "equipment updated");
                self.finish_write(true, UPDATED_MESSAGE).await;
                Ok(updated)
            }
            Err(e) => Err(self.fail_write(e, UPDATE_FAILED_MESSAGE)),
        }
    }

    /// Delete a record, then re-fetch.
    pub async fn delete_item(&self, id: &EquipmentId) -> Result<(), CoreError> {
        self.begin_write();

        match self.inner.client.delete_equipment(id.as_str()).await {
            Ok(()) => {
                info!(%id, "equipment deleted");
                self.finish_write(false, DELETED_MESSAGE).await;
                Ok(())
            }
            Err(e) => Err(self.fail_write(e, DELETE_FAILED_MESSAGE)),
        }
    }

    // ── Internals ────────────────────────────────────────────────

    fn check(&self, validation: Result<(), FieldErrors>) -> Result<(), CoreError> {
        match validation {
            Ok(()) => {
                self.inner
                    .state
                    .send_if_modified(|s| !std::mem::take(&mut s.field_errors).is_empty());
                Ok(())
            }
            Err(errors) => {
                debug!(fields = errors.len(), "form rejected");
                self.inner
                    .state
                    .send_modify(|s| s.field_errors = errors.clone());
                Err(CoreError::Validation(errors))
            }
        }
    }

    fn begin_write(&self) {
        self.inner.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    async fn finish_write(&self, close_modal: bool, message: &str) {
        if let Err(e) = self.fetch_items().await {
            warn!(error = %e, "refresh after write failed");
        }
        if close_modal {
            self.close_modal();
        }
        self.notify(Notice::success(message));
    }

    fn fail_write(&self, e: stockroom_api::Error, message: &str) -> CoreError {
        let err = self.record_failure(e);
        self.notify(Notice::error(message));
        err
    }

    /// Translate a gateway error, apply the 401 policy, and record it.
    fn record_failure(&self, e: stockroom_api::Error) -> CoreError {
        let transient = e.is_transient();
        let err = CoreError::from(e);
        if err.is_session_expired() {
            self.inner.session.expire();
        }
        warn!(error = %err, transient, "inventory request failed");
        let message = err.to_string();
        self.inner.state.send_modify(|s| {
            s.error = Some(message);
            s.loading = false;
        });
        err
    }

    fn notify(&self, notice: Notice) {
        // No subscribers is fine.
        let _ = self.inner.notices.send(notice);
    }
}
