//! noircam Core Library
//!
//! Motion-triggered recording for libcamera cameras.
//!
//! This library provides:
//! - Date-based output paths for recordings
//! - A background launcher for the capture program with PID tracking
//! - A graceful-then-forced stop sequence
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  spawn   ┌────────────────┐
//! │   Launcher   │─────────▶│ libcamera-vid  │
//! └──────┬───────┘          └────────────────┘
//!        │ PID                      ▲
//!        ▼                          │ SIGINT / SIGKILL
//! ┌──────────────┐   PID    ┌───────┴────────┐
//! │  State file  │─────────▶│   Terminator   │
//! └──────────────┘          └────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod launcher;
pub mod paths;
pub mod process;
pub mod state;
pub mod terminator;

pub use config::{ConfigFile, RecorderConfig, Timing};
pub use error::{NoircamError, Result};
pub use launcher::{CaptureCommand, Launcher, RecordingSession};
pub use paths::OutputLayout;
pub use process::{ProcessControl, UnixSignals};
pub use state::StateFile;
pub use terminator::{StopOutcome, StopPhase, Terminator};
