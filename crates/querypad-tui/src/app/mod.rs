mod focus;

pub use focus::{Focus, FocusController};

use std::sync::Arc;
use std::time::Instant;

use querypad_client::{Dispatcher, SearchOutcome, SuggestionSource};
use querypad_core::{Fragment, QueryBuffer, Selection, Typesetter, WidgetConfig};
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::event::AppEvent;
use crate::keys::{self, HeldKeys};
use crate::theme::NordTheme;

/// Text of the info line under the result list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusLine {
    #[default]
    Idle,
    Results(usize),
    NoMatches(String),
    Error(String),
}

impl std::fmt::Display for StatusLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::Results(n) => write!(f, "Displaying {n} results"),
            Self::NoMatches(query) => write!(f, "Found 0 matching results for \"{query}\""),
            Self::Error(msg) => write!(f, "Search failed: {msg}"),
        }
    }
}

/// Query editor plus live entity lookup.
///
/// Owns all state of the screen: the editor text, the cursor snapshot taken
/// when the editor last lost focus, the lookup box, the rendered suggestions
/// and the selection into them.
pub struct SearchWidget {
    pub should_quit: bool,
    pub editor: QueryBuffer,
    pub lookup: QueryBuffer,
    pub results: Vec<Fragment>,
    pub selection: Selection,
    pub status: StatusLine,
    pub theme: NordTheme,
    pub(crate) held: HeldKeys,
    focus: Focus,
    saved: QueryBuffer,
    visibility: FocusController,
    dispatcher: Dispatcher<AppEvent>,
    typesetter: Box<dyn Typesetter>,
    viewport: Rect,
}

impl SearchWidget {
    pub fn new(
        config: &WidgetConfig,
        source: Arc<dyn SuggestionSource>,
        typesetter: Box<dyn Typesetter>,
        tx: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            should_quit: false,
            editor: QueryBuffer::default(),
            lookup: QueryBuffer::default(),
            results: Vec::new(),
            selection: Selection::NoSelection,
            status: StatusLine::Idle,
            theme: NordTheme::default(),
            held: HeldKeys::default(),
            focus: Focus::Editor,
            saved: QueryBuffer::default(),
            visibility: FocusController::new(config.blur_grace()),
            dispatcher: Dispatcher::new(source, config.debounce(), tx),
            typesetter,
            viewport: Rect::default(),
        }
    }

    /// Replace the editor content; the caret goes to the end.
    pub fn load_query(&mut self, text: &str) {
        self.editor = QueryBuffer::at_end(text);
        self.saved = self.editor.clone();
    }

    /// Put the widget in its initial focus. A pre-filled lookup is searched
    /// immediately rather than after the debounce delay.
    pub fn start(&mut self, lookup: Option<&str>) {
        match lookup.filter(|text| !text.is_empty()) {
            Some(text) => {
                self.lookup = QueryBuffer::at_end(text);
                self.set_focus(Focus::Lookup, Instant::now());
                self.dispatcher.dispatch_now(text);
            }
            None => self.set_focus(Focus::Editor, Instant::now()),
        }
    }

    // ─── Accessors ─────────────────────────────────────────

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Editor content and caret as of the editor's last loss of focus.
    pub fn saved_query(&self) -> &QueryBuffer {
        &self.saved
    }

    pub fn list_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    pub fn is_searching(&self) -> bool {
        self.dispatcher.is_pending()
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
    }

    // ─── Events ────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => keys::handle_key(self, key),
            AppEvent::Mouse(mouse) => keys::handle_mouse(self, mouse),
            AppEvent::Resize(_, _) => {}
            AppEvent::Tick => self.tick(Instant::now()),
            AppEvent::Search(outcome) => self.handle_search(outcome),
        }
    }

    pub fn tick(&mut self, now: Instant) {
        if self.visibility.poll(now, self.focus) {
            debug!("result list hidden");
        }
    }

    // ─── Focus ─────────────────────────────────────────────

    pub fn set_focus(&mut self, target: Focus, now: Instant) {
        let previous = self.focus;
        if previous == Focus::Editor && target != Focus::Editor {
            self.saved = self.editor.clone();
        }
        self.focus = target;

        if target.keeps_list_open() {
            self.visibility.on_focus();
        } else if previous.keeps_list_open() {
            self.visibility.on_blur(now);
        }
        if previous != target {
            debug!(from = %previous, to = %target, "focus changed");
        }
    }

    pub fn focus_editor(&mut self) {
        self.set_focus(Focus::Editor, Instant::now());
    }

    pub fn focus_lookup(&mut self) {
        self.set_focus(Focus::Lookup, Instant::now());
    }

    /// A click on suggestion `index`.
    pub fn click_result(&mut self, index: usize) {
        if index >= self.results.len() {
            return;
        }
        self.set_focus(Focus::Results, Instant::now());
        self.selection = Selection::Selected(index);
    }

    // ─── Searching ─────────────────────────────────────────

    /// Called after every edit of the lookup box.
    pub fn on_lookup_edited(&mut self) {
        if self.lookup.is_empty() {
            self.dispatcher.cancel();
            self.clear_results();
            return;
        }
        self.dispatcher.schedule(self.lookup.content());
    }

    pub fn handle_search(&mut self, outcome: SearchOutcome) {
        if !self.dispatcher.is_current(outcome.seq) {
            debug!(seq = outcome.seq, query = %outcome.query, "discarding stale search");
            return;
        }
        self.dispatcher.complete(outcome.seq);

        if self.lookup.is_empty() {
            self.clear_results();
            return;
        }

        match outcome.result {
            Ok(data) => {
                self.results = data.into_iter().map(Fragment::parse).collect();
                self.selection = Selection::NoSelection;
                if self.results.is_empty() {
                    self.status = StatusLine::NoMatches(outcome.query);
                } else {
                    self.status = StatusLine::Results(self.results.len());
                    self.typesetter.typeset_all(&mut self.results);
                }
            }
            Err(e) => {
                warn!(query = %outcome.query, error = %e, "search failed");
                self.clear_results();
                self.status = StatusLine::Error(e.to_string());
            }
        }
    }

    fn clear_results(&mut self) {
        self.results.clear();
        self.selection = Selection::NoSelection;
    }

    // ─── Navigation ────────────────────────────────────────

    pub fn select_next(&mut self) {
        self.selection = self.selection.next(self.results.len());
    }

    pub fn select_previous(&mut self) {
        self.selection = self.selection.previous(self.results.len());
    }

    /// Insert the selected item's snippet at the saved editor caret.
    ///
    /// Returns `false` (and changes nothing) when no item is selected or the
    /// item carries no usable payload.
    pub fn accept_selection(&mut self) -> bool {
        let Some(index) = self.selection.index() else {
            return false;
        };
        let Some(fragment) = self.results.get(index) else {
            return false;
        };
        let snippet = match fragment.payload(index) {
            Ok(snippet) => snippet,
            Err(e) => {
                debug!(index, error = %e, "selected item has no usable payload");
                return false;
            }
        };

        self.editor = self.saved.with_inserted(&snippet);
        self.set_focus(Focus::Editor, Instant::now());
        self.lookup.clear();
        self.dispatcher.cancel();
        self.selection = Selection::NoSelection;
        true
    }

    /// Escape: empty the lookup box and the list.
    pub fn dismiss(&mut self) {
        self.lookup.clear();
        self.dispatcher.cancel();
        self.clear_results();
    }
}
