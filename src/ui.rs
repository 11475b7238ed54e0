use crate::app::App;
use crate::braille::BrailleCanvas;
use crate::map::{Lod, MapLayers, Marker, Viewport};
use crate::viz::REDS;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Widget},
    Frame,
};

/// Width of the colour bar panel, borders included
const COLOR_BAR_WIDTH: u16 = 20;

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Split into plot area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Maps and table
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(COLOR_BAR_WIDTH)])
        .split(rows[0]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    render_national(frame, app, top[0]);
    render_color_bar(frame, app, top[1]);
    render_zoom(frame, app, bottom[0]);
    render_table(frame, app, bottom[1]);
    render_status_bar(frame, app, chunks[1]);
}

fn titled_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
}

fn render_national(frame: &mut Frame, app: &App, area: Rect) {
    let block = titled_block(app.plot.title());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Braille gives 2x4 resolution per character
    let viewport = Viewport::conus(inner.width as usize * 2, inner.height as usize * 4);
    let markers = app.plot.national_markers();
    render_map(frame, app, inner, &viewport, Lod::Low, &markers, None);
}

fn render_zoom(frame: &mut Frame, app: &App, area: Rect) {
    let plot = &app.plot;
    let trace = plot.zoomed();
    let title = format!(
        "[{}/{}] {}",
        plot.zoom_position() + 1,
        plot.traces.len(),
        trace.label()
    );
    let block = titled_block(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let corners = trace.corners();
    let viewport = Viewport::fit(
        corners.lower_left,
        corners.upper_right,
        inner.width as usize * 2,
        inner.height as usize * 4,
    );
    let markers = plot.zoom_markers();
    let center = Some((trace.center_position.lon, trace.center_position.lat));
    render_map(frame, app, inner, &viewport, plot.options.resolution.lod(), &markers, center);
}

fn render_map(
    frame: &mut Frame,
    app: &App,
    inner: Rect,
    viewport: &Viewport,
    lod: Lod,
    markers: &[Marker],
    center: Option<(f64, f64)>,
) {
    let layers = app.map_renderer.render(
        inner.width as usize,
        inner.height as usize,
        viewport,
        lod,
        markers,
        REDS.len(),
        center,
    );
    frame.render_widget(MapWidget { layers }, inner);
}

/// Custom widget that stacks braille layers, each in its own colour
struct MapWidget {
    layers: MapLayers,
}

impl MapWidget {
    /// Render a braille canvas layer with a specific color
    fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        let rows = canvas.height().min(area.height as usize);
        let cols = canvas.width().min(area.width as usize);
        for row in 0..rows {
            for col in 0..cols {
                // Blank cells keep whatever lies underneath
                if let Some(ch) = canvas.glyph(col, row) {
                    let x = area.x + col as u16;
                    let y = area.y + row as u16;
                    buf[(x, y)].set_char(ch).set_fg(color);
                }
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Back to front: basemap, markers light to dark, center cross
        Self::render_layer(&self.layers.coastlines, Color::Gray, area, buf);
        Self::render_layer(&self.layers.borders, Color::Gray, area, buf);
        Self::render_layer(&self.layers.states, Color::DarkGray, area, buf);

        for (canvas, color) in self.layers.markers.iter().zip(REDS) {
            Self::render_layer(canvas, color, area, buf);
        }

        Self::render_layer(&self.layers.center, Color::Cyan, area, buf);
    }
}

fn render_color_bar(frame: &mut Frame, app: &App, area: Rect) {
    let statistic = app.plot.traces[0].statistic;
    let block = titled_block(format!("{} density", statistic));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    let scale = app.plot.scale;
    let label_style = Style::default().fg(Color::White);
    let height = inner.height as usize;

    // Dark end at the top
    let lines: Vec<Line> = (0..height)
        .map(|row| {
            let t = if height > 1 {
                1.0 - row as f64 / (height - 1) as f64
            } else {
                1.0
            };
            let shade = ((t * REDS.len() as f64) as usize).min(REDS.len() - 1);
            let label = if row == 0 {
                format!(" {:.4}", scale.vmax)
            } else if row == height - 1 {
                format!(" {:.4}", scale.vmin)
            } else {
                String::new()
            };
            Line::from(vec![
                Span::styled("██", Style::default().fg(REDS[shade])),
                Span::styled(label, label_style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let table = app.plot.table();
    let block = titled_block(format!("Ranked by density ({})", app.order_label()));

    let header = Row::new(table.headers.clone()).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    let rows = table.rows.into_iter().map(Row::new);
    let widths = [
        Constraint::Percentage(50),
        Constraint::Length(5),
        Constraint::Min(8),
    ];

    let widget = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(widget, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.map_renderer.settings;

    let status = Line::from(vec![
        Span::styled(" Text: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.plot.options.text.to_string(), Style::default().fg(Color::Yellow)),
        Span::styled(" (", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.plot.options.resolution.to_string(),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(") ", Style::default().fg(Color::DarkGray)),
        // Toggle indicators
        Span::styled(
            if settings.show_borders { "[B]order " } else { "[b]order " },
            Style::default().fg(if settings.show_borders { Color::Green } else { Color::DarkGray }),
        ),
        Span::styled(
            if settings.show_states { "[S]tate " } else { "[s]tate " },
            Style::default().fg(if settings.show_states { Color::Green } else { Color::DarkGray }),
        ),
        Span::styled(
            "| Tab/1-9:trace o:order t:text q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let paragraph = Paragraph::new(status);
    frame.render_widget(paragraph, area);
}
