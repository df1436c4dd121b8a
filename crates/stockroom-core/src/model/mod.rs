// ── Domain model ──
//
// Canonical types the controllers operate on. Wire types from
// `stockroom_api` are converted into these in `crate::convert`.

pub mod draft;
pub mod equipment;
pub mod filter;
pub mod session;

pub use draft::{EquipmentDraft, EquipmentPatch, FieldErrors};
pub use equipment::{EXPIRING_SOON_DAYS, Equipment, EquipmentId, EquipmentType, ValidityStatus};
pub use filter::{FilterConfig, FilterUpdate, ModalMode, SortConfig, SortDirection, SortKey};
pub use session::{PersistedSession, SessionPhase, SessionState, User};
