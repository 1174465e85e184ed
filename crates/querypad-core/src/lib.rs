//! Querypad core: query buffer, suggestion fragments, selection, config.

pub mod buffer;
pub mod config;
pub mod error;
pub mod fragment;
pub mod selection;
pub mod typeset;

pub use buffer::{QueryBuffer, splice};
pub use config::{AppConfig, LogConfig, ServerConfig, WidgetConfig};
pub use error::{ExitCode, QuerypadError, Result};
pub use fragment::{Fragment, payload_id};
pub use selection::Selection;
pub use typeset::{Passthrough, Typesetter, UnicodeMath};
