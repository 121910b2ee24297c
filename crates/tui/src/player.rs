use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use lotlapse_core::model::History;
use lotlapse_core::playback::{PlaybackController, Renderer, Speed, TimerRequest, TransportState};
use lotlapse_protocol::{GeoPoint, Rotation, VisibleEntity};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    widgets::Block,
};

const GRID_ORIGIN_X: u16 = 4;
const GRID_ORIGIN_Y: u16 = 3;
const COLUMN_STRIDE: u16 = 6;

/// Entity colors per appearance variant, cycled for larger palettes.
const VARIANT_COLORS: [Color; 4] = [Color::Yellow, Color::Cyan, Color::Green, Color::Magenta];

/// Holds whatever the controller last published.
#[derive(Default)]
struct EntityBuffer {
    entities: Vec<VisibleEntity>,
}

impl Renderer for EntityBuffer {
    fn show_entities(&mut self, entities: &[VisibleEntity]) {
        self.entities = entities.to_vec();
    }
}

/// The driver's copy of the armed timer: request id plus the wall-clock
/// deadline it maps to. A mismatching id from the controller means the
/// deadline is stale and gets replaced.
fn sync_deadline(armed: &mut Option<(u64, Instant)>, timer: Option<TimerRequest>) {
    match timer {
        Some(request) => {
            let stale = armed.is_none_or(|(id, _)| id != request.id);
            if stale {
                *armed = Some((request.id, Instant::now() + request.interval));
            }
        }
        None => *armed = None,
    }
}

fn glyph_for(rotation: Rotation) -> char {
    match rotation {
        Rotation::Deg0 => '▲',
        Rotation::Deg180 => '▼',
    }
}

fn speed_label(speed: Speed) -> &'static str {
    match speed {
        Speed::X1 => "1×",
        Speed::X2 => "2×",
        Speed::X3 => "3×",
    }
}

fn state_label(state: TransportState) -> &'static str {
    match state {
        TransportState::Stopped => "stopped",
        TransportState::Playing => "playing",
        TransportState::Paused => "paused",
    }
}

pub fn run(history: History) -> Result<()> {
    // Positions per column, kept aside before the controller takes the
    // history, so vacant slots can still be drawn.
    let skeleton: Vec<Vec<GeoPoint>> = history.frames()[0]
        .columns()
        .iter()
        .map(|column| column.slots().iter().map(|slot| slot.position).collect())
        .collect();

    let mut controller = PlaybackController::new(history);
    let mut buffer = EntityBuffer::default();
    let mut armed: Option<(u64, Instant)> = None;

    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    loop {
        sync_deadline(&mut armed, controller.timer());

        draw(&mut terminal, &skeleton, &buffer, &controller)?;

        let timeout = match armed {
            Some((_, deadline)) => deadline.saturating_duration_since(Instant::now()),
            None => Duration::from_millis(200),
        };

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char(' ') => {
                        if controller.is_running() {
                            controller.pause();
                        } else {
                            controller.play(&mut buffer);
                        }
                    }
                    KeyCode::Char('s') => controller.stop(false, &mut buffer),
                    KeyCode::Char('r') => controller.stop(true, &mut buffer),
                    KeyCode::Char('x') => controller.change_speed(),
                    KeyCode::Left => {
                        let target = controller.current_frame() as i64 - 1;
                        controller.seek(target, &mut buffer);
                    }
                    KeyCode::Right => {
                        let target = controller.current_frame() as i64 + 1;
                        controller.seek(target, &mut buffer);
                    }
                    KeyCode::Char('0') | KeyCode::Home => controller.seek(0, &mut buffer),
                    KeyCode::Char('$') | KeyCode::End => {
                        controller.seek(i64::MAX, &mut buffer);
                    }
                    _ => {}
                }
            }
        } else if let Some((_, deadline)) = armed
            && Instant::now() >= deadline
        {
            controller.tick(&mut buffer);
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn draw(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    skeleton: &[Vec<GeoPoint>],
    buffer: &EntityBuffer,
    controller: &PlaybackController,
) -> Result<()> {
    terminal.draw(|frame| {
        let area = frame.area();

        let header_area = Rect::new(0, 0, area.width, 1);
        let header = Block::default()
            .title(" lotlapse — space play/pause | ←→ seek | x speed | s stop | r replay | q quit ")
            .style(Style::default().fg(Color::White).bg(Color::DarkGray));
        frame.render_widget(header, header_area);

        let buf = frame.buffer_mut();

        // Lot grid: one terminal column block per lane, one row per slot.
        for (c, positions) in skeleton.iter().enumerate() {
            let x = GRID_ORIGIN_X + c as u16 * COLUMN_STRIDE;
            if x >= area.width {
                continue;
            }
            for (s, position) in positions.iter().enumerate() {
                let y = GRID_ORIGIN_Y + s as u16;
                if y >= area.height.saturating_sub(1) {
                    continue;
                }
                let occupant = buffer
                    .entities
                    .iter()
                    .find(|entity| entity.position == *position);
                match occupant {
                    Some(entity) => {
                        let color = VARIANT_COLORS[entity.variant % VARIANT_COLORS.len()];
                        buf[(x, y)]
                            .set_char(glyph_for(entity.rotation))
                            .set_fg(color);
                    }
                    None => {
                        buf[(x, y)].set_char('·').set_fg(Color::DarkGray);
                    }
                }
            }
        }

        // Transport status.
        let status = format!(
            " frame {:>3}/{} | {} | {} | {} cars visible ",
            controller.current_frame() + 1,
            controller.frame_count(),
            state_label(controller.state()),
            speed_label(controller.speed()),
            buffer.entities.len(),
        );
        let status_y = area.height.saturating_sub(1);
        for (i, ch) in status.chars().enumerate() {
            let x = i as u16;
            if x >= area.width {
                break;
            }
            buf[(x, status_y)]
                .set_char(ch)
                .set_fg(Color::White)
                .set_bg(Color::DarkGray);
        }
    })?;
    Ok(())
}
