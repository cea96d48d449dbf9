use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::best::KeyValueStore;
use crate::evaluator::Verdict;
use crate::timer::Clock;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

impl<K: KeyValueStore, C: Clock> Widget for &App<K, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = self.view();
        let session = self.test.session();
        let pulsing = view.is_pulsing(Instant::now());

        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);
        let underlined_dim_bold_style = Style::default()
            .patch(dim_bold_style)
            .add_modifier(Modifier::UNDERLINED);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let border_style = if pulsing {
            Style::default().fg(Color::Yellow).patch(bold_style)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" typetest ");
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // sample / mode / best
                Constraint::Length(1), // padding
                Constraint::Min(1),    // target text
                Constraint::Length(1), // clock and stats
                Constraint::Length(1), // padding
                Constraint::Length(1), // legend
            ])
            .split(inner);

        let header = Paragraph::new(Span::styled(
            format!(
                "{}   {}   best {}",
                self.source.label(),
                session.mode(),
                view.best_label()
            ),
            dim_bold_style,
        ))
        .alignment(Alignment::Center);
        header.render(chunks[0], buf);

        let typed_len = session.typed().len();
        let mut spans = session
            .target()
            .iter()
            .zip(view.verdicts.iter())
            .enumerate()
            .map(|(idx, (expected, verdict))| {
                let style = match verdict {
                    Verdict::Correct => green_bold_style,
                    Verdict::Incorrect => red_bold_style,
                    Verdict::Unmarked if idx == typed_len && view.input_enabled => {
                        underlined_dim_bold_style
                    }
                    Verdict::Unmarked => dim_bold_style,
                };
                let symbol = match (verdict, expected) {
                    (Verdict::Incorrect, ' ') => "·".to_owned(),
                    (_, c) => c.to_string(),
                };
                Span::styled(symbol, style)
            })
            .collect::<Vec<Span>>();

        // characters typed past the end of the target
        let surplus: String = session.typed().iter().skip(session.target().len()).collect();
        if !surplus.is_empty() {
            spans.push(Span::styled(surplus, red_bold_style));
        }

        let target_width = session.target().iter().collect::<String>().width();
        let single_line = target_width <= chunks[2].width as usize;
        let text = Paragraph::new(Line::from(spans))
            .alignment(if single_line {
                // when the prompt is small enough to fit on one line
                // centering the text gives a nice zen feeling
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: false });
        text.render(chunks[2], buf);

        let mut stats = format!(
            "time {}   {} wpm   {}% acc",
            view.clock_label(),
            view.stats.wpm,
            view.stats.accuracy
        );
        if pulsing {
            stats.push_str("   NEW BEST!");
        }
        let stats_style = if session.has_ended() {
            Style::default().fg(Color::Magenta).patch(bold_style)
        } else {
            bold_style
        };
        Paragraph::new(Span::styled(stats, stats_style))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        let legend = if view.input_enabled {
            "(enter) start / (tab) mode / (←) restart / (→) next / (esc)ape"
        } else {
            "(r)estart / (n)ext / (m)ode / (q)uit"
        };
        Paragraph::new(Span::styled(legend, italic_style)).render(chunks[5], buf);
    }
}
