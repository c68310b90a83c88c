// Workbench - the main window of a running session
//
// Panels and rendering live outside the launcher. The lifecycle only needs to show the window,
// learn when the user wants to close it, and read back where the window ended up.

use crate::models::WindowGeometry;
use crate::services::Dataset;
use std::io::{BufRead, Write};

/// The presentation layer of a running session.
pub trait Workbench {
    /// Show the session window at `geometry`.
    fn show(&mut self, dataset: &Dataset, geometry: WindowGeometry);

    /// Bring the tracking tab to the front; called when tracking is started automatically.
    fn select_tracking(&mut self);

    /// Block until the user asks to close the window.
    fn wait_for_close_request(&mut self);

    /// Current window bounds.
    fn geometry(&self) -> WindowGeometry;

    /// Tear the window down.
    fn dispose(&mut self);
}

/// Line-oriented stand-in for the desktop workbench.
///
/// Commands:
/// - `quit` / `q` / end of input: request close
/// - `geometry X Y W H`: move the window
/// - `status`: print the session summary
pub struct ConsoleWorkbench<R, W> {
    input: R,
    output: W,
    geometry: WindowGeometry,
    summary: String,
}

impl ConsoleWorkbench<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleWorkbench<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            geometry: WindowGeometry::new(0, 0, 0, 0),
            summary: String::new(),
        }
    }

    fn say(&mut self, line: &str) {
        if let Err(e) = writeln!(self.output, "{}", line) {
            tracing::debug!("Console output failed: {}", e);
        }
    }

    fn parse_geometry(args: &[&str]) -> Option<WindowGeometry> {
        match args {
            [x, y, w, h] => Some(WindowGeometry::new(
                x.parse().ok()?,
                y.parse().ok()?,
                w.parse().ok()?,
                h.parse().ok()?,
            )),
            _ => None,
        }
    }
}

impl<R: BufRead, W: Write> Workbench for ConsoleWorkbench<R, W> {
    fn show(&mut self, dataset: &Dataset, geometry: WindowGeometry) {
        self.geometry = geometry;
        self.summary = format!(
            "{} ({} frames, time points {}..={})",
            dataset.path, dataset.frame_count, dataset.time_range.min, dataset.time_range.max
        );
        let banner = format!("tr2d: {}", self.summary);
        self.say(&banner);
        self.say("Commands: status | geometry X Y W H | quit");
    }

    fn select_tracking(&mut self) {
        self.say("Tracking started automatically.");
    }

    fn wait_for_close_request(&mut self) {
        let mut line = String::new();
        loop {
            line.clear();
            match self.input.read_line(&mut line) {
                Ok(0) => return,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Console input failed ({}), treating as close request", e);
                    return;
                }
            }

            let words: Vec<&str> = line.split_whitespace().collect();
            match words.as_slice() {
                ["quit"] | ["q"] | ["exit"] => return,
                ["status"] => {
                    let status = format!("{} at {:?}", self.summary, self.geometry);
                    self.say(&status);
                }
                ["geometry", rest @ ..] => match Self::parse_geometry(rest) {
                    Some(geometry) => self.geometry = geometry,
                    None => self.say("usage: geometry X Y W H"),
                },
                [] => {}
                _ => self.say("unknown command"),
            }
        }
    }

    fn geometry(&self) -> WindowGeometry {
        self.geometry
    }

    fn dispose(&mut self) {
        let _ = self.output.flush();
    }
}
