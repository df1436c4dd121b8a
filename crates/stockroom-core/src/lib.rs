//! Controller layer between `stockroom-api` and a presentation front end.
//!
//! This crate owns the business logic and observable state of the
//! equipment inventory manager:
//!
//! - **[`SessionController`]**: the auth state machine. Restores a persisted
//!   token, verifies it, logs in and out, and performs the forced local
//!   logout when the backend answers 401. [`AuthGate`] decides what a
//!   protected surface renders.
//!
//! - **[`InventoryController`]**: the collection plus filters, sort, page,
//!   selection and modal state. Writes are validated locally, sent to the
//!   backend, and always followed by a full re-fetch.
//!
//! - **[`view`]**: pure functions computing the sorted page, empty-state
//!   classification, and pager metadata from an [`InventoryState`].
//!
//! - **[`Debouncer`]**: explicit schedule/cancel timer used for search.
//!
//! - **[`Stockroom`]**: wires everything around one gateway client and runs
//!   the load-then-verify startup sequence.
//!
//! State is published through `tokio::sync::watch` channels; write outcomes
//! are broadcast as [`Notice`]s. Core never touches disk: the session record
//! goes through the [`SessionStore`] trait.

pub mod app;
pub mod config;
pub mod convert;
pub mod debounce;
pub mod error;
pub mod inventory;
pub mod model;
pub mod session;
pub mod store;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use app::Stockroom;
pub use config::{ClientConfig, TlsVerification};
pub use debounce::Debouncer;
pub use error::CoreError;
pub use inventory::{InventoryController, InventoryState, Notice, NoticeLevel};
pub use session::{AuthGate, GateView, SessionController};
pub use store::{MemorySessionStore, SessionStore};
pub use view::{EmptyState, InventoryView, PageLink, ShowingRange};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Equipment, EquipmentDraft, EquipmentId, EquipmentPatch, EquipmentType, FieldErrors,
    FilterConfig, FilterUpdate, ModalMode, PersistedSession, SessionPhase, SessionState,
    SortConfig, SortDirection, SortKey, User, ValidityStatus,
};

// Credentials are built by front ends and passed straight to `login`.
pub use stockroom_api::Credentials;
