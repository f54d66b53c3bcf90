// Shared pieces of word-lookup used by both the launcher (`trigger`) and the
// window process (`ui-gtk`).
//
// Everything here is UI-free so it can be exercised by plain unit tests.

pub mod client;
pub mod config;
pub mod lookup;
pub mod protocol;
pub mod server;
pub mod session;
pub mod sources;

pub use config::Config;
pub use protocol::{DEFAULT_ADDR, MAX_WORD_BYTES, PLACEHOLDER};
pub use server::{claim, Claim, CoordinationServer};
pub use session::Session;
pub use sources::{Source, SourceError, SourceSet};

pub const APP_DIR_NAME: &str = "word-lookup";
