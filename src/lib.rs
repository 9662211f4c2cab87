pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod generator;
pub mod keyboard;
pub mod logging;
pub mod session;

pub use app::App;
pub use config::{Config, SessionConfig};
pub use error::{ConfigError, ContentError, SessionError};
pub use event::{EventSink, SessionEvent};
pub use generator::{ContentProvider, Curriculum};
pub use session::Mode;
pub use session::typing::{InputSession, SessionState};
