use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::{App, Focus, InputMode};
use crate::common::errors::InputField;
use crate::report::{result_rows, tick_summary, SUCCESS_MESSAGE};
use crate::session::Outcome;

pub const TITLE: &str = "Futures Position Size Calculator";

const FIELDS: [InputField; 4] = [
    InputField::EntryPrice,
    InputField::StopPrice,
    InputField::AccountSize,
    InputField::RiskPercent,
];

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(4), // Contract
            Constraint::Length(3), // Entry
            Constraint::Length(3), // Stop
            Constraint::Length(3), // Account
            Constraint::Length(3), // Risk
            Constraint::Length(3), // Buttons
            Constraint::Min(8),    // Output
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    // Title
    let title = Paragraph::new(TITLE)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_contract(f, app, chunks[1]);
    for (field, area) in FIELDS.iter().zip(&chunks[2..6]) {
        render_field(f, app, *field, *area);
    }
    render_buttons(f, app, chunks[6]);
    render_output(f, app, chunks[7]);
    render_help(f, app, chunks[8]);

    if app.input_mode == InputMode::ChoosingContract {
        render_contract_picker(f, app);
    }
}

fn focus_style(app: &App, focus: Focus) -> Style {
    if app.focus == focus {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn render_contract(f: &mut Frame, app: &App, area: Rect) {
    let spec = app.session.contract();
    let lines = vec![
        Line::from(vec![
            Span::raw("◀ "),
            Span::styled(spec.name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" ▶"),
        ]),
        Line::from(Span::styled(
            tick_summary(spec),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let contract = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(app, Focus::Contract))
            .title("Select Futures Contract"),
    );
    f.render_widget(contract, area);
}

fn render_field(f: &mut Frame, app: &App, field: InputField, area: Rect) {
    let editing = app.input_mode == InputMode::Editing(field);
    let text = if editing {
        Span::styled(app.input.value(), Style::default().fg(Color::Yellow))
    } else {
        Span::raw(app.display_value(field))
    };

    let widget = Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(app, Focus::Field(field)))
            .title(field.label()),
    );
    f.render_widget(widget, area);

    if editing {
        let width = area.width.saturating_sub(2) as usize;
        let scroll = app.input.visual_scroll(width);
        let cursor = app.input.visual_cursor().saturating_sub(scroll) as u16;
        f.set_cursor_position((area.x + 1 + cursor, area.y + 1));
    }
}

fn render_buttons(f: &mut Frame, app: &App, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (focus, label, rect) in [
        (Focus::Calculate, "Calculate Position Size", halves[0]),
        (Focus::Reset, "Reset", halves[1]),
    ] {
        let button = Paragraph::new(label)
            .style(focus_style(app, focus))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(focus_style(app, focus)),
            );
        f.render_widget(button, rect);
    }
}

fn render_output(f: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = match app.session.outcome() {
        None => vec![Line::from(Span::styled(
            "Fill in the form and press Calculate Position Size",
            Style::default().fg(Color::DarkGray),
        ))],
        Some(Outcome::Rejected(err)) => vec![Line::from(Span::styled(
            format!("⚠ {err}"),
            Style::default().fg(Color::Yellow),
        ))],
        Some(Outcome::Sized(size)) => {
            let mut lines = Vec::new();
            if let Some(advisory) = size.advisory {
                lines.push(Line::from(Span::styled(
                    format!("✗ {}", advisory.message()),
                    Style::default().fg(Color::Red),
                )));
            }
            lines.push(Line::from(Span::styled(
                format!("✓ {SUCCESS_MESSAGE}"),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )));
            lines.extend(result_rows(size).into_iter().map(|(label, value)| {
                Line::from(vec![
                    Span::styled(
                        format!("{label}: "),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(value),
                ])
            }));
            lines
        }
    };

    let output = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Result"));
    f.render_widget(output, area);
}

fn render_help(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(status) = &app.status {
        Line::from(Span::styled(status.as_str(), Style::default().fg(Color::Red)))
    } else {
        let help = match app.input_mode {
            InputMode::Normal => {
                "↑↓/Tab: Move | Enter: Edit/Select | +/-: Step | c: Calculate | r: Reset | q: Quit"
            }
            InputMode::Editing(_) => "Enter: Apply | Esc: Cancel",
            InputMode::ChoosingContract => "↑↓: Navigate | Enter: Select | Esc: Cancel",
        };
        Line::from(help)
    };

    let help = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

fn render_contract_picker(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 70, f.area());

    let items: Vec<ListItem> = app
        .session
        .table()
        .iter()
        .map(|spec| ListItem::new(spec.name.as_str()))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Contracts"))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("● ");

    let mut state = ListState::default();
    state.select(Some(app.contract_cursor));

    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut state);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
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
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::CalculatorSettings;
    use crate::contracts::ContractTable;
    use crate::session::Session;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 40)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn new_app() -> App {
        App::new(Session::new(
            ContractTable::builtin(),
            CalculatorSettings::default(),
        ))
    }

    #[test]
    fn test_initial_form() {
        let screen = render(&new_app());
        assert!(screen.contains(TITLE));
        assert!(screen.contains("NQ (E-mini Nasdaq 100)"));
        assert!(screen.contains("Tick Size: 0.25 | Tick Value: $5.00"));
        assert!(screen.contains("Risk per Trade (%)"));
        assert!(screen.contains("1.00"));
        assert!(screen.contains("Calculate Position Size"));
    }

    #[test]
    fn test_sized_output() {
        let mut app = new_app();
        app.session.set_text(InputField::EntryPrice, "18000").unwrap();
        app.session.set_text(InputField::StopPrice, "17950").unwrap();
        app.session.set_text(InputField::AccountSize, "50000").unwrap();
        app.session.set_text(InputField::RiskPercent, "2").unwrap();
        app.session.calculate();

        let screen = render(&app);
        assert!(screen.contains(SUCCESS_MESSAGE));
        assert!(screen.contains("$1000.00"));
        assert!(screen.contains("200.00 ticks"));
        assert!(screen.contains("1 contracts (rounded down)"));
    }

    #[test]
    fn test_warning_output() {
        let mut app = new_app();
        app.session.calculate();

        let screen = render(&app);
        assert!(screen.contains("Please fill in all inputs"));
        assert!(!screen.contains(SUCCESS_MESSAGE));
    }

    #[test]
    fn test_contract_picker_overlay() {
        let mut app = new_app();
        app.input_mode = InputMode::ChoosingContract;
        app.contract_cursor = 1;

        let screen = render(&app);
        assert!(screen.contains("Contracts"));
        assert!(screen.contains("● ES (E-mini S&P 500)"));
    }
}
