use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::app::{Focus, SearchWidget, StatusLine};

/// Tallest the suggestion list gets, borders included.
const MAX_LIST_HEIGHT: u16 = 12;

const HINTS: &str = "C-Space lookup · ↑↓ select · Enter insert · Esc clear · C-q quit";

/// Screen regions. Shared by rendering and mouse hit-testing.
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    pub header: Rect,
    pub editor: Rect,
    pub lookup: Rect,
    pub results: Option<Rect>,
    pub status: Rect,
}

pub fn screen_areas(area: Rect, widget: &SearchWidget) -> ScreenAreas {
    let list_height = if widget.list_visible() && !widget.results.is_empty() {
        widget
            .results
            .len()
            .saturating_add(2)
            .min(MAX_LIST_HEIGHT as usize) as u16
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),           // header
            Constraint::Min(3),              // query editor
            Constraint::Length(3),           // lookup box
            Constraint::Length(list_height), // suggestions
            Constraint::Length(1),           // status bar
        ])
        .split(area);

    ScreenAreas {
        header: chunks[0],
        editor: chunks[1],
        lookup: chunks[2],
        results: (list_height > 0).then_some(chunks[3]),
        status: chunks[4],
    }
}

/// First visible list row when `selected` must be on screen.
fn list_offset(selected: Option<usize>, height: usize) -> usize {
    match selected {
        Some(s) if height > 0 && s >= height => s + 1 - height,
        _ => 0,
    }
}

/// Index of the suggestion drawn on terminal row `row` of `list`.
pub fn result_at(widget: &SearchWidget, list: Rect, row: u16) -> Option<usize> {
    let inner = Block::default().borders(Borders::ALL).inner(list);
    if row < inner.y || row >= inner.y + inner.height {
        return None;
    }
    let offset = list_offset(widget.selection.index(), inner.height as usize);
    let index = offset + (row - inner.y) as usize;
    (index < widget.results.len()).then_some(index)
}

/// Render the entire UI.
pub fn render(frame: &mut Frame, widget: &SearchWidget) {
    let areas = screen_areas(frame.area(), widget);

    render_header(frame, widget, areas.header);
    render_editor(frame, widget, areas.editor);
    render_lookup(frame, widget, areas.lookup);
    if let Some(list) = areas.results {
        render_results(frame, widget, list);
    }
    render_status_bar(frame, widget, areas.status);
}

fn panel_block<'a>(widget: &SearchWidget, title: &'a str, focused: bool) -> Block<'a> {
    let border = if focused {
        widget.theme.active_panel()
    } else {
        widget.theme.inactive_panel()
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

// ─── Header ────────────────────────────────────────────────

fn render_header(frame: &mut Frame, widget: &SearchWidget, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", widget.focus()),
            Style::default()
                .fg(widget.theme.bg())
                .bg(widget.theme.active_panel())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" querypad", Style::default().fg(widget.theme.selection_marker())),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

// ─── Query editor ──────────────────────────────────────────

fn render_editor(frame: &mut Frame, widget: &SearchWidget, area: Rect) {
    let focused = widget.focus() == Focus::Editor;
    let block = panel_block(widget, " Query ", focused);
    let inner = block.inner(area);

    let (line, col) = widget.editor.line_col();
    let scroll_y = line.saturating_sub(inner.height.saturating_sub(1) as usize);
    let scroll_x = col.saturating_sub(inner.width.saturating_sub(1) as usize);

    let lines: Vec<Line> = widget
        .editor
        .content()
        .split('\n')
        .map(|l| Line::from(l.to_string()))
        .collect();
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(widget.theme.fg()))
        .scroll((scroll_y as u16, scroll_x as u16));
    frame.render_widget(paragraph, area);

    if focused {
        frame.set_cursor_position(Position::new(
            inner.x + (col - scroll_x) as u16,
            inner.y + (line - scroll_y) as u16,
        ));
    }
}

// ─── Lookup box ────────────────────────────────────────────

fn render_lookup(frame: &mut Frame, widget: &SearchWidget, area: Rect) {
    let focused = widget.focus() == Focus::Lookup;
    let title = if widget.is_searching() {
        " Lookup (searching…) "
    } else {
        " Lookup "
    };
    let block = panel_block(widget, title, focused);
    let inner = block.inner(area);

    let col = widget.lookup.cursor();
    let scroll_x = col.saturating_sub(inner.width.saturating_sub(1) as usize);
    let paragraph = Paragraph::new(widget.lookup.content().to_string())
        .block(block)
        .style(Style::default().fg(widget.theme.fg()))
        .scroll((0, scroll_x as u16));
    frame.render_widget(paragraph, area);

    if focused {
        frame.set_cursor_position(Position::new(inner.x + (col - scroll_x) as u16, inner.y));
    }
}

// ─── Suggestions ───────────────────────────────────────────

fn render_results(frame: &mut Frame, widget: &SearchWidget, area: Rect) {
    let block = panel_block(widget, " Suggestions ", widget.focus() == Focus::Results);

    let items: Vec<ListItem> = widget
        .results
        .iter()
        .map(|fragment| ListItem::new(fragment.display().to_string()))
        .collect();

    let list = List::new(items)
        .block(block)
        .style(Style::default().fg(widget.theme.fg()))
        .highlight_style(
            Style::default()
                .fg(widget.theme.selection_fg())
                .bg(widget.theme.selection_bg())
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = ListState::default().with_selected(widget.selection.index());
    frame.render_stateful_widget(list, area, &mut state);
}

// ─── Status bar ────────────────────────────────────────────

fn render_status_bar(frame: &mut Frame, widget: &SearchWidget, area: Rect) {
    let status_color = match widget.status {
        StatusLine::Idle => widget.theme.muted(),
        StatusLine::Results(_) => widget.theme.success(),
        StatusLine::NoMatches(_) => widget.theme.warning(),
        StatusLine::Error(_) => widget.theme.danger(),
    };

    let status = widget.status.to_string();
    let pad = (area.width as usize)
        .saturating_sub(status.chars().count() + HINTS.chars().count() + 2);

    let line = Line::from(vec![
        Span::styled(format!(" {status}"), Style::default().fg(status_color)),
        Span::raw(" ".repeat(pad)),
        Span::styled(HINTS, Style::default().fg(widget.theme.muted())),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(widget.theme.bg())),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StaticSource, widget_with};
    use querypad_client::SearchOutcome;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    async fn widget_with_results() -> crate::app::SearchWidget {
        let source = StaticSource::default().with("foo", &["<b>foo1</b>", "<b>foo2</b>"]);
        let (mut widget, mut rx, _source) = widget_with(source);
        widget.load_query("SELECT ?e");
        widget.start(Some("foo"));
        let event = rx.recv().await.unwrap();
        widget.handle_event(event);
        widget
    }

    #[test]
    fn test_list_offset_keeps_selection_visible() {
        assert_eq!(list_offset(None, 5), 0);
        assert_eq!(list_offset(Some(4), 5), 0);
        assert_eq!(list_offset(Some(7), 5), 3);
        assert_eq!(list_offset(Some(3), 0), 0);
    }

    #[tokio::test]
    async fn test_render_shows_results_and_status() {
        let mut widget = widget_with_results().await;
        widget.select_next();

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| render(frame, &widget)).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("SELECT ?e"));
        assert!(text.contains("▶ foo1"));
        assert!(text.contains("foo2"));
        assert!(text.contains("Displaying 2 results"));
        assert!(text.contains("LOOKUP"));
    }

    #[tokio::test]
    async fn test_hidden_list_takes_no_space() {
        let (widget, _rx, _source) = widget_with(StaticSource::default());
        let areas = screen_areas(Rect::new(0, 0, 80, 24), &widget);
        assert!(areas.results.is_none());
        assert_eq!(areas.status.y, 23);
    }

    #[tokio::test]
    async fn test_huge_result_set_is_capped() {
        let (mut widget, _rx, _source) = widget_with(StaticSource::default());
        widget.focus_lookup();
        widget.results = (0..70_000)
            .map(|i| querypad_core::Fragment::parse(format!("r{i}")))
            .collect();
        widget.select_previous();

        let area = Rect::new(0, 0, 80, 24);
        let list = screen_areas(area, &widget).results.unwrap();
        assert_eq!(list.height, MAX_LIST_HEIGHT);

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(frame, &widget)).unwrap();
        assert!(buffer_text(&terminal).contains("▶ r69999"));
    }

    #[tokio::test]
    async fn test_result_at_maps_rows_to_items() {
        let mut widget = widget_with_results().await;
        let area = Rect::new(0, 0, 80, 24);
        widget.set_viewport(area);
        let list = screen_areas(area, &widget).results.unwrap();

        assert_eq!(result_at(&widget, list, list.y), None); // top border
        assert_eq!(result_at(&widget, list, list.y + 1), Some(0));
        assert_eq!(result_at(&widget, list, list.y + 2), Some(1));
        assert_eq!(result_at(&widget, list, list.y + 3), None); // bottom border

        // An outcome nobody is waiting for leaves the list alone.
        widget.handle_event(crate::event::AppEvent::Search(SearchOutcome {
            seq: 0,
            query: "old".into(),
            result: Ok(vec![]),
        }));
        assert_eq!(widget.results.len(), 2);
    }
}
