//! UI rendering
//!
//! Pure rendering functions that transform state into terminal frames.
//! Texts and card formatting come from `libreadiego::present`, so the
//! terminal shows the same wording as every other front-end.

use crate::app::state::tab_index;
use crate::app::AppState;
use libreadiego::present::{self, BookCard};
use libreadiego::service::{DisplayItems, DisplaySelection};
use libreadiego::types::{QueryMode, Statistics};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

/// Render the application UI
///
/// Pure function: Takes state, returns nothing, but draws to frame.
/// This is the main rendering entry point.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let has_error = state.session.error.is_some();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),                                  // Header
            Constraint::Length(5),                                  // Statistics
            Constraint::Length(if has_error { 3 } else { 0 }),      // Error banner
            Constraint::Length(7),                                  // Search
            Constraint::Min(3),                                     // Results
            Constraint::Length(1),                                  // Key hints
        ])
        .split(area);

    render_header(frame, chunks[0]);
    render_stats(frame, chunks[1], state);
    if let Some(ref error) = state.session.error {
        render_error_banner(frame, chunks[2], error, state);
    }
    render_search(frame, chunks[3], state);
    render_results(frame, chunks[4], state);
    render_hints(frame, chunks[5]);

    if state.help_visible {
        render_help_overlay(frame, area);
    }
}

fn accent(state: &AppState, color: Color) -> Style {
    if state.config.colors_enabled {
        Style::default().fg(color)
    } else {
        Style::default()
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            present::APP_TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(present::APP_SUBTITLE),
    ])
    .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

/// Statistics card; shows the loading text for as long as there is nothing
/// to show, including after a failed load
fn render_stats(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(format!(" {} ", present::STATS_TITLE))
        .borders(Borders::ALL);

    let Some(ref stats) = state.session.statistics else {
        let loading = Paragraph::new(present::STATS_LOADING)
            .style(accent(state, Color::Yellow))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(loading, area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);
    render_stat_figures(frame, inner, stats, state);
}

fn render_stat_figures(frame: &mut Frame, area: Rect, stats: &Statistics, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (figure, column) in present::stat_figures(stats).iter().zip(columns.iter()) {
        let cell = Paragraph::new(vec![
            Line::from(Span::styled(
                figure.value.clone(),
                accent(state, Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(figure.label),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(cell, *column);
    }
}

fn render_error_banner(frame: &mut Frame, area: Rect, error: &str, state: &AppState) {
    let banner = Paragraph::new(Line::from(vec![
        Span::raw(error),
        Span::styled("   ✕ Esc", Style::default().add_modifier(Modifier::DIM)),
    ]))
    .style(accent(state, Color::Red))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(accent(state, Color::Red)),
    );

    frame.render_widget(banner, area);
}

fn render_search(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(format!(" {} ", present::SEARCH_TITLE))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Length(1), // Description
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Input
            Constraint::Min(0),
        ])
        .split(inner);

    let titles: Vec<Line> = QueryMode::ALL
        .iter()
        .map(|mode| Line::from(present::search_tab(*mode).title))
        .collect();
    let tabs = Tabs::new(titles)
        .select(tab_index(state.active_tab))
        .highlight_style(accent(state, Color::Cyan).add_modifier(Modifier::BOLD | Modifier::UNDERLINED));
    frame.render_widget(tabs, rows[0]);

    let tab = present::search_tab(state.active_tab);
    frame.render_widget(
        Paragraph::new(tab.description).style(Style::default().add_modifier(Modifier::ITALIC)),
        rows[1],
    );

    let input = state.input();
    let field = if input.is_empty() {
        Span::styled(tab.placeholder, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(input)
    };
    let button = if state.session.loading {
        tab.busy_button
    } else {
        tab.button
    };
    let line = Line::from(vec![
        Span::raw("> "),
        field,
        Span::raw("   "),
        Span::styled(
            format!("[ {button} ]"),
            accent(state, Color::Green).add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), rows[3]);
}

fn render_results(frame: &mut Frame, area: Rect, state: &AppState) {
    match &state.session.display {
        DisplaySelection::Hidden => {}
        DisplaySelection::Loading { label } => {
            let loading = Paragraph::new(present::RESULTS_LOADING)
                .style(accent(state, Color::Yellow))
                .alignment(Alignment::Center)
                .block(Block::default().title(format!(" {label} ")).borders(Borders::ALL));
            frame.render_widget(loading, area);
        }
        DisplaySelection::Results { label, items } => {
            let cards: Vec<BookCard> = match items {
                DisplayItems::Recommendations(items) => items.iter().map(BookCard::from).collect(),
                DisplayItems::UserBooks(items) => items.iter().map(BookCard::from).collect(),
            };

            let lines: Vec<Line> = cards.iter().flat_map(|card| card_lines(card, state)).collect();

            let results = Paragraph::new(lines)
                .block(
                    Block::default()
                        .title(format!(" {label} "))
                        .title_bottom(format!(" {} ", present::results_count(cards.len())))
                        .borders(Borders::ALL),
                )
                .wrap(Wrap { trim: false })
                .scroll((state.results_scroll, 0));
            frame.render_widget(results, area);
        }
    }
}

/// Three lines per book: title with badge, author and year, ISBN
fn card_lines<'a>(card: &'a BookCard, state: &AppState) -> Vec<Line<'a>> {
    let mut title = vec![Span::styled(
        card.title.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(ref badge) = card.badge {
        title.push(Span::raw("  "));
        title.push(Span::styled(badge.as_str(), accent(state, Color::Yellow)));
    }

    let mut lines = vec![
        Line::from(title),
        Line::from(format!("  {} · {}", card.author, card.year)),
    ];
    if let Some(ref isbn) = card.isbn_line {
        lines.push(Line::from(Span::styled(
            format!("  {isbn}"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));
    lines
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let hints = Paragraph::new("Tab: Change search | Enter: Search | ↑↓ PgUp PgDn: Scroll | Esc: Dismiss | F1: Help | q: Quit")
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(hints, area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  Tab        - Next search tab"),
        Line::from("  Shift+Tab  - Previous search tab"),
        Line::from("  Enter      - Run the search"),
        Line::from("  Up/Down    - Scroll results"),
        Line::from("  PgUp/PgDn  - Scroll results by a page"),
        Line::from("  Esc        - Dismiss the error banner"),
        Line::from("  q          - Quit (when the input is empty)"),
        Line::from("  Ctrl+C     - Quit"),
        Line::from("  F1         - Toggle help"),
        Line::from(""),
        Line::from("Press Esc or F1 to close"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(help, popup_area);
}

/// Helper to create centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SessionView;
    use libreadiego::types::{BookSummary, RecommendationItem, Relevance};
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| render(frame, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_renders_loading_statistics_and_placeholder() {
        let screen = draw(&AppState::new());

        assert!(screen.contains("Cargando estad"));
        assert!(screen.contains("Ej: 276725, 11676, 198711..."));
        assert!(screen.contains("Recomendar"));
    }

    #[test]
    fn test_renders_error_banner_and_results() {
        let mut state = AppState::new();
        state.session = SessionView {
            statistics: Some(Statistics {
                user_count: 1200,
                book_count: 8500,
                rating_count: 10000,
                density: 0.00098,
            }),
            loading: false,
            error: Some("Usuario 1 no encontrado o sin libros".to_string()),
            result_type: libreadiego::types::ResultType::SimilarBooks,
            display: DisplaySelection::Results {
                label: "📖 Libros Similares",
                items: DisplayItems::Recommendations(vec![RecommendationItem {
                    book_id: "0439139597".to_string(),
                    book_info: BookSummary::bare("0439139597"),
                    relevance: Relevance::Similarity(0.42),
                    method: None,
                }]),
            },
        };

        let screen = draw(&state);

        assert!(screen.contains("Usuario 1 no encontrado o sin libros"));
        assert!(screen.contains("1,200"));
        assert!(screen.contains("ISBN: 0439139597"));
        assert!(screen.contains("1 resultados"));
    }

    fn ten_results() -> SessionView {
        let items = (0..10)
            .map(|i| RecommendationItem {
                book_id: format!("00000000{i}"),
                book_info: BookSummary {
                    title: Some(format!("Libro {i:02}")),
                    ..BookSummary::bare(format!("00000000{i}"))
                },
                relevance: Relevance::Score(3.5),
                method: None,
            })
            .collect();
        SessionView {
            result_type: libreadiego::types::ResultType::UserRecommendations,
            display: DisplaySelection::Results {
                label: "📚 Recomendaciones para ti",
                items: DisplayItems::Recommendations(items),
            },
            ..SessionView::default()
        }
    }

    #[test]
    fn test_results_scroll_reveals_later_cards() {
        let mut state = AppState::new();
        state.session = ten_results();

        let screen = draw(&state);
        assert!(screen.contains("Libro 00"));
        assert!(!screen.contains("Libro 09"));

        // Four lines per card
        state.results_scroll = 20;
        let screen = draw(&state);
        assert!(!screen.contains("Libro 00"));
        assert!(screen.contains("Libro 05"));
        assert!(screen.contains("Libro 09"));
        assert!(screen.contains("10 resultados"));
    }
}
