pub mod app;
pub mod event;
pub mod keys;
pub mod theme;
pub mod ui;

#[cfg(test)]
mod test_support;

use std::io::{self, Stdout};
use std::sync::Arc;

use anyhow::Result;
use crossterm::ExecutableCommand;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use querypad_client::SuggestionSource;
use querypad_core::{AppConfig, Passthrough, Typesetter, UnicodeMath};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tracing::info;

use app::SearchWidget;
use event::{AppEvent, EventHandler};

/// What the editor and lookup box hold when the screen opens.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub query: String,
    pub lookup: Option<String>,
}

fn restore_terminal(enhanced: bool) -> io::Result<()> {
    let mut stdout = io::stdout();
    if enhanced {
        stdout.execute(PopKeyboardEnhancementFlags)?;
    }
    stdout.execute(DisableMouseCapture)?;
    stdout.execute(LeaveAlternateScreen)?;
    disable_raw_mode()
}

/// Run the query editor until the user quits. Returns the final query text.
pub async fn run_tui(
    config: &AppConfig,
    source: Arc<dyn SuggestionSource>,
    options: LaunchOptions,
) -> Result<String> {
    // Key release events only arrive with the enhancement flags pushed.
    let enhanced = matches!(supports_keyboard_enhancement(), Ok(true));

    // Install panic hook
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal(enhanced);
        original_hook(info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    if enhanced {
        stdout.execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let (tx, mut rx) = unbounded_channel();
    let _events = EventHandler::spawn(tx.clone(), config.widget.tick_rate());

    let typesetter: Box<dyn Typesetter> = if config.widget.typeset_math {
        Box::new(UnicodeMath)
    } else {
        Box::new(Passthrough)
    };
    let mut widget = SearchWidget::new(&config.widget, source, typesetter, tx);
    widget.load_query(&options.query);
    widget.start(options.lookup.as_deref());
    info!(enhanced, "editor started");

    let outcome = event_loop(&mut terminal, &mut widget, &mut rx).await;

    // Restore terminal
    restore_terminal(enhanced)?;
    outcome?;
    Ok(widget.editor.content().to_string())
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    widget: &mut SearchWidget,
    rx: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        let size = terminal.size()?;
        widget.set_viewport(Rect::new(0, 0, size.width, size.height));
        terminal.draw(|frame| ui::render(frame, widget))?;

        let Some(event) = rx.recv().await else {
            break;
        };
        widget.handle_event(event);

        if widget.should_quit {
            break;
        }
    }
    Ok(())
}
