use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use querypad_client::{Result, SuggestionSource};
use querypad_core::{UnicodeMath, WidgetConfig};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use crate::app::SearchWidget;
use crate::event::AppEvent;

/// Canned responses keyed by query; records every query served.
#[derive(Default)]
pub(crate) struct StaticSource {
    responses: HashMap<String, Vec<String>>,
    calls: Mutex<Vec<String>>,
}

impl StaticSource {
    pub(crate) fn with(mut self, query: &str, items: &[&str]) -> Self {
        self.responses.insert(
            query.to_string(),
            items.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SuggestionSource for StaticSource {
    async fn suggest(&self, query: &str) -> Result<Vec<String>> {
        self.calls.lock().unwrap().push(query.to_string());
        Ok(self.responses.get(query).cloned().unwrap_or_default())
    }
}

pub(crate) fn widget_with(
    source: StaticSource,
) -> (SearchWidget, UnboundedReceiver<AppEvent>, Arc<StaticSource>) {
    let source = Arc::new(source);
    let (tx, rx) = unbounded_channel();
    let widget = SearchWidget::new(
        &WidgetConfig::default(),
        source.clone(),
        Box::new(UnicodeMath),
        tx,
    );
    (widget, rx, source)
}

pub(crate) fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

pub(crate) fn press(code: KeyCode) -> AppEvent {
    AppEvent::Key(key(code, KeyModifiers::NONE))
}

pub(crate) fn type_text(widget: &mut SearchWidget, text: &str) {
    for c in text.chars() {
        widget.handle_event(press(KeyCode::Char(c)));
    }
}
