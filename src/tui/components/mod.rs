//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `TitleBar`: Top status bar showing status and the "↓ New" indicator
//! - `Message`: One conversation message card
//! - `LandingPage`: Welcome text for an empty conversation
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: Multi-line prompt editor
//! - `MessageList`: Scrollable conversation view with layout caching
//!
//! ## Props-Based Data Flow
//!
//! Components receive external data as "props" (struct fields), not by
//! directly accessing global state. This makes dependencies explicit and
//! components testable.
//!
//! ```rust,ignore
//! // Good: Dependencies are explicit
//! TitleBar::new(app.status_message.clone(), app.is_streaming(), unseen).render(frame, area);
//!
//! // Bad: Hidden dependency on global state
//! title_bar.render(frame, area); // reads from global App
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── landing.rs       (Empty-conversation welcome)
//! ├── message.rs       (Single message renderer)
//! ├── message_list.rs  (Scrollable message container)
//! └── input_box/       (Prompt editor)
//! ```

pub mod input_box;
pub mod landing;
pub mod message;
pub mod message_list;
pub mod title_bar;

pub use input_box::{InputBox, InputEvent};
pub use landing::LandingPage;
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;
