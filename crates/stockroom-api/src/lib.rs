// stockroom-api: Async Rust client for the equipment inventory backend

pub mod auth;
pub mod client;
pub mod equipment;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::{Credentials, LOGIN_FAILED_MESSAGE};
pub use client::ApiClient;
pub use error::Error;
pub use models::{
    AuthResponse, CreateEquipmentRequest, EquipmentQuery, EquipmentResponse,
    UpdateEquipmentRequest, UserResponse,
};
pub use transport::{TlsMode, TransportConfig};
