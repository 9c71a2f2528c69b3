//! Demo UI - the display list as plain terminal lines

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};

use senyas_runtime::{AudioCue, DisplayList, DrawCommand, TextRole};

const HELP: &str = "a-z 0-9 sign | F5-F8 phrases | space lower hands | arrows select | \
                    enter click | tab skip | F2 debug | esc quit";

/// Raw-mode terminal, restored on drop
pub struct DemoUi {
    last_sound: Option<String>,
}

impl DemoUi {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen)?;
        Ok(Self { last_sound: None })
    }

    pub fn audio(&mut self, cue: AudioCue) {
        if let AudioCue::Play(key) = cue {
            self.last_sound = Some(key);
        }
    }

    pub fn draw(
        &mut self,
        scene: &str,
        display: &DisplayList,
        selected: usize,
        signing: Option<&str>,
    ) -> io::Result<()> {
        let mut lines = vec![format!("SENYAS  [{scene}]"), String::new()];
        lines.extend(describe(display, selected, signing));
        lines.push(String::new());
        if let Some(sound) = &self.last_sound {
            lines.push(format!("sound: {sound}"));
        }
        lines.push(HELP.to_string());

        let mut stdout = io::stdout();
        queue!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;
        for line in lines {
            // Raw mode needs explicit carriage returns
            write!(stdout, "{line}\r\n")?;
        }
        stdout.flush()
    }
}

impl Drop for DemoUi {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// One text line per draw command
pub fn describe(display: &DisplayList, selected: usize, signing: Option<&str>) -> Vec<String> {
    let mut button = 0;
    display
        .commands()
        .iter()
        .map(|command| match command {
            DrawCommand::Clip {
                key,
                position,
                looping,
            } => {
                let mode = if *looping { " (loop)" } else { "" };
                format!("[clip] {key} {:.1}s{mode}", position.as_secs_f32())
            }
            DrawCommand::Image { key } => format!("[image] {key}"),
            DrawCommand::CameraFeed => match signing {
                Some(sign) => format!("[camera] signing {sign}"),
                None => "[camera] no hands".to_string(),
            },
            DrawCommand::Text { role, text } => match role {
                TextRole::Title => format!("== {text} =="),
                TextRole::Body => text.clone(),
                TextRole::Input => format!("> {text}_"),
                TextRole::Verdict => format!("*** {text} ***"),
                TextRole::Debug => format!("(debug) {text}"),
                TextRole::Notice => format!("! {text}"),
            },
            DrawCommand::Button { name, hovered } => {
                let cursor = if button == selected { ">" } else { " " };
                let hover = if *hovered { "*" } else { " " };
                button += 1;
                format!("{cursor}{hover}[{name}]")
            }
            DrawCommand::Confetti(particles) => format!("confetti x{}", particles.len()),
            DrawCommand::Keyboard => "[keyboard] type a name, enter to submit".to_string(),
        })
        .collect()
}
