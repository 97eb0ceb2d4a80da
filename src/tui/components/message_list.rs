//! # MessageList Component
//!
//! Scrollable view of conversation history.
//!
//! ## Responsibilities
//!
//! - Display list of messages
//! - Manage scrolling specific logic
//! - Hit testing for mouse interactions
//! - Perform efficient layout caching (Message heights)
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the message slice (props).
//!
//! Since `Component::render` takes `&mut self`, we can safely mutate the state
//! (including layout cache and scroll state) during the render pass, aligning
//! with Ratatui's `StatefulWidget` pattern.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::conversation::{Message as ChatMessage, MessageId, Role};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Whether content exists below the viewport (drives the "↓ New" indicator)
    pub has_unseen_content: bool,
    /// Currently selected message index (hover or keyboard navigation)
    pub selected_index: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            has_unseen_content: false,
            selected_index: None,
            viewport_height: 0,
        }
    }

    fn total_height(&self) -> u16 {
        self.layout.heights.iter().sum()
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.total_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Scroll the viewport so the selected message is fully visible.
    /// If the message is taller than the viewport, align its top edge.
    pub fn scroll_to_selected(&mut self) {
        let Some(idx) = self.selected_index else {
            return;
        };
        if idx >= self.layout.prefix_heights.len() {
            return;
        }

        let item_top = if idx == 0 {
            0
        } else {
            self.layout.prefix_heights[idx - 1]
        };
        let item_bottom = self.layout.prefix_heights[idx];
        let offset_y = self.scroll_state.offset().y;

        if item_top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: item_top });
            self.stick_to_bottom = false;
        } else if item_bottom > offset_y + self.viewport_height {
            let new_y = item_bottom.saturating_sub(self.viewport_height);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
            // Re-pin if we've landed at the absolute bottom
            let max_y = self.total_height().saturating_sub(self.viewport_height);
            self.stick_to_bottom = new_y >= max_y;
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.total_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Move the selection one visible message up (`-1`) or down (`1`).
    ///
    /// Hidden messages (height 0) are skipped. With no selection, moving up
    /// selects the last visible message.
    pub fn move_selection(&mut self, direction: i8) {
        let heights = &self.layout.heights;
        let visible = |i: &usize| heights.get(*i).is_some_and(|&h| h > 0);

        let next = match (self.selected_index, direction < 0) {
            (None, true) => (0..heights.len()).rev().find(visible),
            (None, false) => None,
            (Some(current), true) => (0..current).rev().find(visible),
            (Some(current), false) => (current + 1..heights.len()).find(visible),
        };

        if let Some(idx) = next {
            self.selected_index = Some(idx);
            self.scroll_to_selected();
        }
    }

    /// Forget everything tied to the previous conversation.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    // Mutable reference to persistent state
    pub state: &'a mut MessageListState,
    pub messages: &'a [ChatMessage],
    /// The model message being generated, if any
    pub streaming: Option<MessageId>,
    /// The message currently showing the "Copied" acknowledgment
    pub copied: Option<MessageId>,
    pub pulse_value: f32,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [ChatMessage],
        streaming: Option<MessageId>,
        copied: Option<MessageId>,
        pulse_value: f32,
    ) -> Self {
        Self {
            state,
            messages,
            streaming,
            copied,
            pulse_value,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let streaming = self.streaming;

        // 1. Update Layout Cache (Internal Mutation)
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(self.messages, content_width);
        layout.heights.truncate(reusable.min(layout.heights.len()));

        for message in self.messages.iter().skip(layout.heights.len()) {
            let is_streaming = streaming == Some(message.id);
            layout
                .heights
                .push(Message::calculate_height(message, content_width, is_streaming));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(self.messages, content_width);

        let total_height = self.state.total_height();

        // 2. Clamp scroll offset to prevent overscrolling past content.
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible messages into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range {
            let message = &self.messages[i];
            let height = self.state.layout.heights[i];

            // Hidden (empty, finished) model messages take no space
            if height == 0 {
                continue;
            }

            let is_streaming = streaming == Some(message.id);
            let pulse_intensity = if is_streaming { self.pulse_value } else { 0.0 };
            let widget = Message::new(message, is_streaming)
                .selected(self.state.selected_index == Some(i) && !is_streaming)
                .copied(self.copied == Some(message.id))
                .pulse(pulse_intensity);

            scroll_view.render_widget(widget, Rect::new(0, y_offset, content_width, height));
            y_offset += height;
        }

        // Auto-scroll logic (Mutation)
        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        // Update the unseen content indicator
        let current_offset = self.state.scroll_state.offset().y;
        let max_scroll = total_height.saturating_sub(area.height);
        self.state.has_unseen_content = total_height > area.height && current_offset < max_scroll;
    }
}

/// EventHandler is implemented on `MessageListState` rather than `MessageList` because
/// `MessageList` is recreated each frame with fresh props, so it can't hold state.
impl EventHandler for MessageListState {
    type Event = (); // Scrolling is handled internally

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached layout measurements
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    message_count: usize,
    content_width: u16,
    /// First message id at cache time; a different one means the chat was cleared.
    first_id: Option<MessageId>,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            message_count: 0,
            content_width: 0,
            first_id: None,
        }
    }

    /// How many cached heights are still valid for `messages` at `content_width`.
    pub fn reusable_count(&self, messages: &[ChatMessage], content_width: u16) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }

        // Fewer messages, or a different first message, means the chat was cleared
        if messages.len() < self.message_count || messages.first().map(|m| m.id) != self.first_id
        {
            return 0;
        }

        // The last model message is the only one that changes after creation:
        // it grows while streaming and may lose its cursor when the stream ends
        // between frames. Always re-measure it.
        let last_is_volatile = messages.last().is_some_and(|m| m.role == Role::Model);
        if last_is_volatile {
            messages.len().saturating_sub(1)
        } else {
            messages.len()
        }
    }

    pub fn update_metadata(&mut self, messages: &[ChatMessage], content_width: u16) {
        self.message_count = messages.len();
        self.content_width = content_width;
        self.first_id = messages.first().map(|m| m.id);
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc += h;
                Some(*acc)
            })
            .collect();
    }

    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::Conversation;

    fn conversation(entries: &[(Role, &str)]) -> Conversation {
        let mut c = Conversation::new();
        for (role, content) in entries {
            c.push(*role, content.to_string());
        }
        c
    }

    #[test]
    fn test_layout_cache_reusable() {
        let c = conversation(&[(Role::User, "a"), (Role::Model, "b"), (Role::User, "c")]);
        let mut cache = LayoutCache::new();
        cache.heights = vec![3; 3];
        cache.update_metadata(c.messages(), 80);

        // Same everything, stable last message → all reusable
        assert_eq!(cache.reusable_count(c.messages(), 80), 3);

        // Width changed → nothing reusable
        assert_eq!(cache.reusable_count(c.messages(), 40), 0);
    }

    #[test]
    fn test_volatile_last_message_recalculated() {
        let c = conversation(&[(Role::User, "hello"), (Role::Model, "full response")]);
        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 5];
        cache.update_metadata(c.messages(), 80);

        assert_eq!(cache.reusable_count(c.messages(), 80), 1);
    }

    #[test]
    fn test_cleared_chat_invalidates_cache() {
        let mut c = conversation(&[(Role::User, "first"), (Role::Model, "one")]);
        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 3];
        cache.update_metadata(c.messages(), 80);

        // Same count after clear + new submit, but different ids
        c.clear();
        c.push(Role::User, "second".to_string());
        c.push(Role::Model, String::new());
        assert_eq!(cache.reusable_count(c.messages(), 80), 0);
    }

    /// Replays the stale-height case: cache built mid-stream with a short reply,
    /// then the full reply lands in the same batch that ends the stream.
    #[test]
    fn test_stream_end_replaces_stale_height() {
        let width: u16 = 30;
        let mut c = conversation(&[(Role::User, "hi"), (Role::Model, "short")]);
        let reply_to = c.last().map(|m| m.id);

        let mut cache = LayoutCache::new();
        for m in c.messages() {
            let streaming = Some(m.id) == reply_to;
            cache.heights.push(Message::calculate_height(m, width, streaming));
        }
        cache.rebuild_prefix_heights();
        cache.update_metadata(c.messages(), width);
        let stale = cache.heights[1];

        let id = reply_to.unwrap();
        c.replace_last_model_content(
            id,
            "this response is long enough to wrap across multiple lines at width 30",
        );

        let reusable = cache.reusable_count(c.messages(), width);
        assert_eq!(reusable, 1);
        cache.heights.truncate(reusable);
        for m in c.messages().iter().skip(cache.heights.len()) {
            cache.heights.push(Message::calculate_height(m, width, false));
        }

        assert!(cache.heights[1] > stale);
        assert_eq!(
            cache.heights[0],
            Message::calculate_height(&c.messages()[0], width, false)
        );
    }

    #[test]
    fn test_visible_range() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![10; 10];
        cache.rebuild_prefix_heights();

        // Viewport 10 rows at offset 50, buffered by 5 each side: rows 45..65
        let range = cache.visible_range(50, 10);
        assert_eq!(range, 4..7);
    }

    #[test]
    fn test_move_selection_skips_hidden() {
        let mut state = MessageListState::new();
        state.layout.heights = vec![3, 3, 0, 3];
        state.layout.rebuild_prefix_heights();
        state.viewport_height = 100;

        state.move_selection(-1);
        assert_eq!(state.selected_index, Some(3));
        state.move_selection(-1);
        assert_eq!(state.selected_index, Some(1));
        state.move_selection(1);
        assert_eq!(state.selected_index, Some(3));
        // Already at the end
        state.move_selection(1);
        assert_eq!(state.selected_index, Some(3));
    }
}
