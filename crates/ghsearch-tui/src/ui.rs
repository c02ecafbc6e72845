// UI rendering logic
use crate::layout::Panes;
use crate::session::BrowseState;
use ghsearch_core::Browsable;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

/// Message shown in place of the key help
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Everything one frame needs, borrowed from the session
pub struct View<'a, R> {
    pub title: &'a str,
    /// Tab names of a tabbed session; empty for paged sessions
    pub tabs: &'a [String],
    pub rows: &'a [R],
    pub state: &'a BrowseState,
    pub page_size: usize,
    pub notice: Option<&'a Notice>,
    /// `enter` picks the row rather than opening it
    pub picker: bool,
}

/// 1-based rank of `index` on `page`
pub fn rank_label(page: u32, page_size: usize, index: usize) -> usize {
    (page.max(1) as usize - 1) * page_size + index + 1
}

pub fn render<R: Browsable>(frame: &mut Frame, panes: &Panes, view: &View<'_, R>) {
    // A retained layout may be larger than a shrunk terminal
    let area = frame.area();
    let clip = |r: Rect| r.intersection(area);

    render_title(frame, view, clip(panes.title));
    render_list(frame, view, clip(panes.list));
    render_detail(frame, view, clip(panes.detail));
    render_help(frame, view, clip(panes.help));
}

fn render_title<R>(frame: &mut Frame, view: &View<'_, R>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {} ", view.title),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    if view.tabs.is_empty() {
        let line = Line::from(vec![
            Span::styled(
                format!("page {}", view.state.page),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{} results", view.rows.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    }

    let tabs = Tabs::new(view.tabs.iter().map(|t| Line::from(t.as_str())))
        .block(block)
        .select(view.state.tab)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_list<R: Browsable>(frame: &mut Frame, view: &View<'_, R>, area: Rect) {
    let state = view.state;
    let items: Vec<ListItem> = view
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let rank = rank_label(state.page, view.page_size, i);
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>3} ", rank), Style::default().fg(Color::DarkGray)),
                Span::raw(row.summary()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Results ({})", view.rows.len())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let selected = (!view.rows.is_empty()).then_some(state.selected);
    let mut list_state = ListState::default()
        .with_offset(state.scroll)
        .with_selected(selected);
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_detail<R: Browsable>(frame: &mut Frame, view: &View<'_, R>, area: Rect) {
    let lines: Vec<Line> = match view.rows.get(view.state.selected) {
        Some(row) => row
            .details()
            .into_iter()
            .flat_map(|field| {
                [
                    Line::from(Span::styled(
                        field.label,
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(format!("  {}", field.value)),
                ]
            })
            .collect(),
        // Only while the first page is still loading
        None => Vec::new(),
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Detail"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_help<R>(frame: &mut Frame, view: &View<'_, R>, area: Rect) {
    let span = match view.notice {
        Some(Notice::Error(msg)) => Span::styled(msg.as_str(), Style::default().fg(Color::Red)),
        Some(Notice::Info(msg)) => Span::styled(msg.as_str(), Style::default().fg(Color::Yellow)),
        None => Span::raw(help_text(view)),
    };

    frame.render_widget(Paragraph::new(Line::from(span)), area);
}

// Kept under 80 columns
fn help_text<R>(view: &View<'_, R>) -> &'static str {
    if view.picker {
        "j/k move  ^d/^u half page  gg/G top/end  enter pick  q quit"
    } else if view.tabs.is_empty() {
        "j/k move  ^d/^u half page  gg/G top/end  n/p page  enter open  q quit"
    } else {
        "j/k move  ^d/^u half page  gg/G top/end  h/l range  enter open  q quit"
    }
}

/// Whole-screen notice for a fetch that came back with nothing
pub fn render_empty(frame: &mut Frame) {
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "no result",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
    ])
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);
    frame.render_widget(paragraph, frame.area());
}

pub fn render_too_small(frame: &mut Frame) {
    let paragraph = Paragraph::new("terminal too small")
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, frame.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghsearch_core::DetailField;
    use ratatui::{backend::TestBackend, Terminal};

    struct Row(&'static str);

    impl Browsable for Row {
        fn summary(&self) -> String {
            self.0.to_string()
        }

        fn details(&self) -> Vec<DetailField> {
            vec![DetailField::new("Name", self.0)]
        }

        fn url(&self) -> &str {
            "https://example.com"
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_rank_label() {
        assert_eq!(rank_label(1, 30, 0), 1);
        assert_eq!(rank_label(1, 30, 2), 3);
        assert_eq!(rank_label(2, 30, 0), 31);
        assert_eq!(rank_label(0, 30, 4), 5);
    }

    #[test]
    fn test_render_ranks_and_detail() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let rows = [Row("alpha"), Row("beta"), Row("gamma")];
        let mut state = BrowseState::paged(2, rows.len());
        state.selected = 1;

        terminal
            .draw(|f| {
                let panes = Panes::compute(f.area()).unwrap();
                let view = View {
                    title: "lang:go grpc",
                    tabs: &[],
                    rows: &rows,
                    state: &state,
                    page_size: 10,
                    notice: None,
                    picker: false,
                };
                render(f, &panes, &view);
            })
            .unwrap();

        let text = screen_text(&terminal).join("\n");
        assert!(text.contains("lang:go grpc"));
        assert!(text.contains("page 2"));
        assert!(text.contains(" 11 alpha"));
        assert!(text.contains(" 12 beta"));
        assert!(text.contains(" 13 gamma"));
        assert!(text.contains("enter open  q quit"));
    }

    #[test]
    fn test_error_notice_replaces_help() {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        let rows = [Row("alpha")];
        let state = BrowseState::paged(1, 1);
        let notice = Notice::Error("open failed".into());

        terminal
            .draw(|f| {
                let panes = Panes::compute(f.area()).unwrap();
                let view = View {
                    title: "t",
                    tabs: &[],
                    rows: &rows,
                    state: &state,
                    page_size: 30,
                    notice: Some(&notice),
                    picker: false,
                };
                render(f, &panes, &view);
            })
            .unwrap();

        let lines = screen_text(&terminal);
        assert!(lines[11].starts_with("open failed"));
    }

    #[test]
    fn test_tabs_in_title() {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        let rows = [Row("alpha")];
        let tabs = vec!["Today".to_string(), "This week".to_string()];
        let state = BrowseState::tabbed(2, 1);

        terminal
            .draw(|f| {
                let panes = Panes::compute(f.area()).unwrap();
                let view = View {
                    title: "trending",
                    tabs: &tabs,
                    rows: &rows,
                    state: &state,
                    page_size: 30,
                    notice: None,
                    picker: false,
                };
                render(f, &panes, &view);
            })
            .unwrap();

        let text = screen_text(&terminal).join("\n");
        assert!(text.contains("Today"));
        assert!(text.contains("This week"));
        assert!(text.contains("h/l range"));
        assert!(text.contains("q quit"));
    }

    #[test]
    fn test_picker_help() {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        let rows = [Row("go"), Row("rust")];
        let state = BrowseState::tabbed(1, rows.len());

        terminal
            .draw(|f| {
                let panes = Panes::compute(f.area()).unwrap();
                let view = View {
                    title: "select language",
                    tabs: &[],
                    rows: &rows,
                    state: &state,
                    page_size: 30,
                    notice: None,
                    picker: true,
                };
                render(f, &panes, &view);
            })
            .unwrap();

        let lines = screen_text(&terminal);
        assert!(lines[11].contains("enter pick  q quit"));
        assert!(!lines[11].contains("n/p page"));
    }

    #[test]
    fn test_render_empty() {
        let mut terminal = Terminal::new(TestBackend::new(40, 6)).unwrap();
        terminal.draw(render_empty).unwrap();
        assert!(screen_text(&terminal).join("\n").contains("no result"));
    }
}
