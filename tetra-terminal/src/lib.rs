/// Terminal preview of the rotating tetrahedron
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tetra_core::{AppState, FrameSource, SceneConfig, Viewport};

pub mod frames;
pub mod renderer;

pub use frames::PacedFrames;
pub use renderer::AsciiRenderer;

/// Orbit step per arrow key press, in radians
const KEY_ORBIT_STEP: f32 = 0.2;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    app: AppState,
    renderer: AsciiRenderer,
    frames: PacedFrames,
    running: bool,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: SceneConfig, fps: u32) -> anyhow::Result<Self> {
        let (width, height) = terminal::size()?;
        let renderer = AsciiRenderer::new(width as usize, height as usize);
        let (pixel_width, pixel_height) = renderer.pixel_size();
        let app = AppState::new(config, Viewport::new(pixel_width, pixel_height)?)?;

        Ok(Self {
            app,
            renderer,
            frames: PacedFrames::new(fps),
            running: true,
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        while self.running {
            if self.frames.next_frame().is_none() {
                break;
            }

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }
            if !self.running {
                break;
            }

            // Update and rasterize
            self.app.frame(&mut self.renderer)?;

            // Output to terminal
            self.present()?;

            // Update FPS counter
            self.frame_count += 1;
            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> anyhow::Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                let renderer = AsciiRenderer::new(width as usize, height as usize);
                let (pixel_width, pixel_height) = renderer.pixel_size();
                match self.app.resize(pixel_width, pixel_height, 1.0) {
                    Ok(_) => self.renderer = renderer,
                    Err(err) => log::warn!("ignoring resize: {err}"),
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('w') | KeyCode::Up => {
                self.app.controls_mut().rotate_up(KEY_ORBIT_STEP);
            }
            KeyCode::Char('s') | KeyCode::Down => {
                self.app.controls_mut().rotate_up(-KEY_ORBIT_STEP);
            }
            KeyCode::Char('a') | KeyCode::Left => {
                self.app.controls_mut().rotate_left(KEY_ORBIT_STEP);
            }
            KeyCode::Char('d') | KeyCode::Right => {
                self.app.controls_mut().rotate_left(-KEY_ORBIT_STEP);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.app.wheel(-1.0);
            }
            KeyCode::Char('-') => {
                self.app.wheel(1.0);
            }
            KeyCode::Char('m') => {
                self.app.toggle_display_mode();
            }
            _ => {}
        }
    }

    fn present(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Tetra | FPS: {:.1} | {:?} | WASD/Arrows=Orbit +/-=Zoom M=Mode Q=Quit",
                self.fps,
                self.app.display_mode()
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
