//! # Core Application Logic
//!
//! This module contains Lume's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │ Generation │
//!             │  Adapter   │          │   Client   │
//!             │ (ratatui)  │          │  (reqwest) │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and `update()` reducer
//! - [`conversation`]: Messages and their ids
//! - [`content`]: Splitting replies into prose and code blocks
//! - [`config`]: Layered configuration

pub mod action;
pub mod config;
pub mod content;
pub mod conversation;
pub mod state;
