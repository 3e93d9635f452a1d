use crate::app::App;
use crate::braille::{BrailleCanvas, Paint};
use crate::map::{raster, BackgroundGradient, BACKGROUND};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

/// Render the UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Split into map area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_map(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Visited Countries ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    // Braille gives 2x4 resolution per character
    let mut canvas = BrailleCanvas::new(inner.width as usize, inner.height as usize);
    let (pixel_w, pixel_h) = canvas.pixel_size();

    let background = match app.compose(pixel_w as f64, pixel_h as f64) {
        Ok(instructions) => raster::render(&mut canvas, &instructions),
        Err(e) => {
            log::error!("compose failed: {e}");
            None
        }
    };

    let widget = MapWidget {
        canvas,
        background: background.unwrap_or(BACKGROUND),
        loading: app.geometries().is_none(),
    };
    frame.render_widget(widget, inner);
}

/// Widget that paints the braille cells over a vertical ocean gradient
struct MapWidget {
    canvas: BrailleCanvas,
    background: BackgroundGradient,
    loading: bool,
}

impl MapWidget {
    /// Gradient color for one character row
    fn row_background(&self, row: usize, rows: usize) -> Color {
        let t = if rows <= 1 {
            0.0
        } else {
            row as f64 / (rows - 1) as f64
        };
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        let (top, bottom) = (self.background.top, self.background.bottom);
        Color::Rgb(
            mix(top.0, bottom.0),
            mix(top.1, bottom.1),
            mix(top.2, bottom.2),
        )
    }
}

fn paint_color(paint: Paint) -> Color {
    match paint {
        Paint::Shadow => Color::Rgb(6, 10, 16),
        Paint::VisitedFill => Color::Rgb(64, 172, 90),
        Paint::UnvisitedFill => Color::Rgb(118, 126, 134),
        Paint::VisitedBorder => Color::Rgb(140, 230, 160),
        Paint::UnvisitedBorder => Color::Rgb(178, 186, 194),
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = (self.canvas.height()).min(area.height as usize);
        let cols = (self.canvas.width()).min(area.width as usize);

        for cy in 0..rows {
            let bg = self.row_background(cy, rows);
            let y = area.y + cy as u16;
            for cx in 0..cols {
                let x = area.x + cx as u16;
                let (ch, paint) = self.canvas.cell(cx, cy);
                let cell = &mut buf[(x, y)];
                cell.set_bg(bg);
                if ch != ' ' {
                    let fg = paint.map(paint_color).unwrap_or(Color::White);
                    cell.set_char(ch).set_fg(fg);
                }
            }
        }

        if self.loading {
            let text = " loading geometry… ";
            let x = area.x + (area.width.saturating_sub(text.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            for (i, ch) in text.chars().enumerate() {
                let px = x + i as u16;
                if px < area.x + area.width {
                    buf[(px, y)].set_char(ch).set_fg(Color::Yellow);
                }
            }
        }
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let total = app.geometries().map(|g| g.len()).unwrap_or(0);
    let selected = app.selected_code().unwrap_or_else(|| "--".to_string());
    let skipped = app.skipped_count();

    let mut spans = vec![
        Span::styled(" ", Style::default()),
        Span::styled(
            selected,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}/{} visited ", app.visited.len(), total),
            Style::default().fg(Color::Green),
        ),
    ];
    if skipped > 0 {
        spans.push(Span::styled(
            format!("({skipped} outlines skipped) "),
            Style::default().fg(Color::Red),
        ));
    }
    spans.push(Span::styled(
        "| ↑/↓:select space:toggle q:quit | ",
        Style::default().fg(Color::DarkGray),
    ));
    spans.push(Span::styled(
        app.description(),
        Style::default().fg(Color::Cyan),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
