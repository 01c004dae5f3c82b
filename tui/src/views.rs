//! View Rendering
//!
//! Draws the current view from a snapshot of the core's store and stage.
//! The stage's transient classes (`entering`/`leaving`) render as dimmed
//! styling, which is as much of a crossfade as a terminal gets.

use folio_core::config::{classes, regions};
use folio_core::{Catalog, Stage, StageTarget, StateStore, Theme, View};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::theme::Palette;

/// Transition-relevant classes of one region.
#[derive(Clone, Copy, Debug, Default)]
pub struct RegionLook {
    /// Region bears the `active` class.
    pub active: bool,
    /// Region is fading in.
    pub entering: bool,
    /// Region is fading out.
    pub leaving: bool,
}

impl RegionLook {
    fn capture(stage: &Stage, region: &str) -> Self {
        let target = StageTarget::region(region);
        Self {
            active: stage.has_class(&target, classes::ACTIVE),
            entering: stage.has_class(&target, classes::ENTERING),
            leaving: stage.has_class(&target, classes::LEAVING),
        }
    }

    fn in_transition(self) -> bool {
        self.entering || self.leaving
    }
}

/// Everything the renderer needs, captured under the core locks and then
/// rendered lock-free.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Current view.
    pub view: View,
    /// 1-based open project index.
    pub project_index: usize,
    /// Current theme.
    pub theme: Theme,
    /// Whether audio cues are enabled.
    pub sound_enabled: bool,
    /// Home region classes.
    pub home: RegionLook,
    /// Grid region classes.
    pub grid: RegionLook,
    /// Detail region classes.
    pub detail: RegionLook,
    /// Stage scroll position (detail summary offset).
    pub scroll: u16,
}

impl Snapshot {
    /// Capture the render-relevant state.
    #[must_use]
    pub fn capture(store: &StateStore, stage: &Stage) -> Self {
        Self {
            view: store.view(),
            project_index: store.project_index(),
            theme: store.theme(),
            sound_enabled: store.sound_enabled(),
            home: RegionLook::capture(stage, regions::HOME),
            grid: RegionLook::capture(stage, regions::GRID),
            detail: RegionLook::capture(stage, regions::DETAIL),
            scroll: stage.scroll(),
        }
    }
}

/// Draw one frame.
#[allow(clippy::too_many_arguments)]
pub fn render(
    frame: &mut Frame<'_>,
    snapshot: &Snapshot,
    catalog: &Catalog,
    palette: &Palette,
    selected: usize,
    banner: Option<&str>,
    overlay: Option<&[String]>,
) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    match snapshot.view {
        View::Home => render_home(frame, chunks[0], snapshot, palette),
        View::Portfolio => render_grid(frame, chunks[0], snapshot, catalog, palette, selected),
        View::Project => render_detail(frame, chunks[0], snapshot, catalog, palette),
    }

    render_status(frame, chunks[1], snapshot, palette);

    if let Some(lines) = overlay {
        render_overlay(frame, area, lines, palette);
    }
    if let Some(message) = banner {
        render_banner(frame, area, message, palette);
    }
}

fn body_style(look: RegionLook, palette: &Palette) -> Style {
    if look.in_transition() {
        Style::default().fg(palette.dim)
    } else {
        Style::default().fg(palette.text)
    }
}

fn render_home(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot, palette: &Palette) {
    let style = body_style(snapshot.home, palette);
    let lines = vec![
        Line::default(),
        Line::styled(
            "F O L I O",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Line::default(),
        Line::styled("selected works & experiments", style),
        Line::default(),
        Line::styled("press Enter to browse", Style::default().fg(palette.dim)),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        area,
    );
}

fn render_grid(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &Snapshot,
    catalog: &Catalog,
    palette: &Palette,
    selected: usize,
) {
    let style = body_style(snapshot.grid, palette);
    let items: Vec<ListItem<'_>> = catalog
        .projects()
        .iter()
        .enumerate()
        .map(|(i, project)| {
            let index = i + 1;
            let line = Line::from(vec![
                Span::styled(
                    format!("{index:>2}  "),
                    Style::default().fg(palette.dim),
                ),
                Span::styled(project.title.clone(), style),
                Span::styled(
                    format!("  ({})", project.year),
                    Style::default().fg(palette.accent_soft),
                ),
            ]);
            if index == selected {
                ListItem::new(line).style(
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.dim))
            .title(" portfolio "),
    );
    frame.render_widget(list, area);
}

fn render_detail(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &Snapshot,
    catalog: &Catalog,
    palette: &Palette,
) {
    let style = body_style(snapshot.detail, palette);
    let Some(project) = catalog.get(snapshot.project_index) else {
        frame.render_widget(
            Paragraph::new("no project open").style(Style::default().fg(palette.dim)),
            area,
        );
        return;
    };

    let width = usize::from(area.width.saturating_sub(4)).max(20);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                project.title.clone(),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", project.year),
                Style::default().fg(palette.dim),
            ),
        ]),
        Line::styled(
            project.stack.join(" · "),
            Style::default().fg(palette.accent_soft),
        ),
        Line::default(),
    ];
    for wrapped in textwrap::wrap(&project.summary, width) {
        lines.push(Line::styled(wrapped.into_owned(), style));
    }

    let paragraph = Paragraph::new(lines)
        .scroll((snapshot.scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.dim))
                .title(format!(
                    " {} / {} ",
                    snapshot.project_index,
                    catalog.len()
                )),
        );
    frame.render_widget(paragraph, area);
}

fn render_status(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot, palette: &Palette) {
    let sound = if snapshot.sound_enabled { "on" } else { "off" };
    let hints = match snapshot.view {
        View::Home => "Enter open · t theme · s sound · q quit",
        View::Portfolio => "↑↓ select · Enter open · Esc home · q quit",
        View::Project => "←→ prev/next · Esc grid · q quit",
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", snapshot.view.as_str()),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("sound {sound} · {} ", snapshot.theme.as_str()),
            Style::default().fg(palette.dim),
        ),
        Span::styled(hints, Style::default().fg(palette.dim)),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(palette.status_bg)),
        area,
    );
}

fn render_overlay(frame: &mut Frame<'_>, area: Rect, lines: &[String], palette: &Palette) {
    let width = area.width.saturating_sub(4).min(70);
    let height = u16::try_from(lines.len())
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .min(area.height.saturating_sub(2));
    let overlay_area = Rect::new(area.width.saturating_sub(width + 1), 1, width, height);

    let text: Vec<Line<'_>> = lines
        .iter()
        .map(|line| Line::styled(line.clone(), Style::default().fg(palette.text)))
        .collect();
    frame.render_widget(Clear, overlay_area);
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent_soft))
                .title(" diagnostics "),
        ),
        overlay_area,
    );
}

fn render_banner(frame: &mut Frame<'_>, area: Rect, message: &str, palette: &Palette) {
    let height = 5u16.min(area.height);
    let banner_area = Rect::new(
        area.x + 2,
        area.height / 2,
        area.width.saturating_sub(4),
        height,
    );
    frame.render_widget(Clear, banner_area);
    frame.render_widget(
        Paragraph::new(vec![
            Line::styled(
                message.to_string(),
                Style::default()
                    .fg(palette.error)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::default(),
            Line::styled(
                "please restart the application",
                Style::default().fg(palette.text),
            ),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.error)),
        ),
        banner_area,
    );
}
