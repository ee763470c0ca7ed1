//! External API integrations

pub mod auth;
pub mod remote;
pub mod wire;

pub use auth::{CredentialProvider, StaticCredentials};
pub use remote::{RemoteHistory, RemoteHistoryClient};
pub use wire::RemoteSaved;
