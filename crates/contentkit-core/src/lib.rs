//! contentkit Core Library
//!
//! Configuration, error handling and calendar utilities shared by the
//! contentkit renderer and CLI.

pub mod calendar;
pub mod config;
pub mod error;

pub use calendar::{Adjustment, Calendar, CurrentDateStyle, DateInput};
pub use config::{BuildConfig, CalendarConfig, Config, RenderConfig, SanitizerBackend, SanitizerConfig};
pub use error::{CoreError, Result};
