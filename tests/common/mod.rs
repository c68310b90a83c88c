//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::VecDeque;
use std::fs;
use std::io::{self, Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tiff::encoder::{TiffEncoder, colortype};
use tr2d::error::OptimizerError;
use tr2d::lifecycle::Collaborators;
use tr2d::services::{
    GurobiProbe, OptimizerProbe, SessionExporter, TiffStackLoader, TrackingJob, TrackingRunner,
};
use tr2d::ui::{ConsoleWorkbench, Prompt, Prompter, Selection};
use tr2d::{LifecycleController, WindowGeometry, WindowStateStore};

pub fn create_temp_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, path)
}

pub const FRAME_WIDTH: u32 = 6;
pub const FRAME_HEIGHT: u32 = 4;

/// An 8-bit grey TIFF stack with `frames` frames of `FRAME_WIDTH` x `FRAME_HEIGHT` pixels.
pub fn synthetic_tiff(frames: u16) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    let mut encoder = TiffEncoder::new(&mut cursor).unwrap();
    for frame in 0..frames {
        let pixels: Vec<u8> = (0..FRAME_WIDTH * FRAME_HEIGHT)
            .map(|i| (i + u32::from(frame) * 8) as u8)
            .collect();
        encoder
            .write_image::<colortype::Gray8>(FRAME_WIDTH, FRAME_HEIGHT, &pixels)
            .unwrap();
    }
    drop(encoder);
    cursor.into_inner()
}

pub fn write_stack(dir: &Utf8Path, name: &str, frames: u16) -> Utf8PathBuf {
    let path = dir.join(name);
    fs::write(&path, synthetic_tiff(frames)).unwrap();
    path
}

pub fn make_dir(parent: &Utf8Path, name: &str) -> Utf8PathBuf {
    let path = parent.join(name);
    fs::create_dir_all(&path).unwrap();
    path
}

/// A fake Gurobi installation that passes every availability check.
pub fn install_gurobi(root: &Utf8Path) -> GurobiProbe {
    let home = root.join("gurobi");
    fs::create_dir_all(home.join("lib")).unwrap();
    fs::write(home.join("lib/libgurobi110.so"), b"").unwrap();
    let license = root.join("gurobi.lic");
    fs::write(&license, "LICENSEID=1\n").unwrap();
    GurobiProbe::new(Some(home), Some(license))
}

/// Answers prompts from a fixed script and records every prompt it saw.
///
/// Notices are acknowledged without consuming the script; a prompt past the end of the script is
/// dismissed.
#[derive(Clone, Default)]
pub struct ScriptedPrompter {
    answers: Arc<Mutex<VecDeque<Selection>>>,
    seen: Arc<Mutex<Vec<Prompt>>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Selection>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().collect())),
            seen: Arc::default(),
        }
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.seen.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<Prompt> {
        self.prompts()
            .into_iter()
            .filter(|p| matches!(p, Prompt::Notice { .. }))
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }
}

impl Prompter for ScriptedPrompter {
    fn present(&self, prompt: Prompt) -> Selection {
        let is_notice = matches!(prompt, Prompt::Notice { .. });
        self.seen.lock().unwrap().push(prompt);
        if is_notice {
            return Selection::Acknowledged;
        }
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Selection::Dismissed)
    }
}

/// Optimizer probe with a fixed answer that counts how often it was asked.
#[derive(Clone, Default)]
pub struct FixedOptimizer {
    pub error: Option<OptimizerError>,
    pub calls: Arc<AtomicUsize>,
}

impl OptimizerProbe for FixedOptimizer {
    fn check_available(&self) -> Result<(), OptimizerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

/// Records the tracking jobs it was given.
#[derive(Default)]
pub struct RecordingTracker {
    pub jobs: Mutex<Vec<TrackingJob>>,
}

impl TrackingRunner for RecordingTracker {
    fn run(&self, job: TrackingJob) -> anyhow::Result<()> {
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }
}

/// `Write` handle whose contents stay readable after the writer was moved away.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub const DEFAULT_GEOMETRY: WindowGeometry = WindowGeometry {
    x: 360,
    y: 28,
    width: 1200,
    height: 1024,
};

/// Everything needed to drive a full run with real collaborators except dialogs.
pub struct Harness {
    pub prompter: ScriptedPrompter,
    pub optimizer: Box<dyn OptimizerProbe>,
    pub tracker: Arc<RecordingTracker>,
    pub console_input: String,
    pub console_output: SharedBuffer,
    pub runtime: tokio::runtime::Runtime,
}

impl Harness {
    pub fn new(optimizer: impl OptimizerProbe + 'static, answers: Vec<Selection>) -> Self {
        Self {
            prompter: ScriptedPrompter::new(answers),
            optimizer: Box::new(optimizer),
            tracker: Arc::default(),
            console_input: "quit\n".to_string(),
            console_output: SharedBuffer::default(),
            runtime: tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap(),
        }
    }

    pub fn console_input(mut self, input: &str) -> Self {
        self.console_input = input.to_string();
        self
    }

    pub fn controller(&mut self) -> LifecycleController {
        let optimizer = std::mem::replace(&mut self.optimizer, Box::new(FixedOptimizer::default()));
        let collaborators = Collaborators {
            prompter: Box::new(self.prompter.clone()),
            optimizer,
            loader: Box::new(TiffStackLoader::new()),
            workbench: Box::new(ConsoleWorkbench::new(
                Cursor::new(self.console_input.clone().into_bytes()),
                self.console_output.clone(),
            )),
            tracker: self.tracker.clone(),
            exporter: Box::new(SessionExporter::new()),
        };
        LifecycleController::new(
            collaborators,
            WindowStateStore::new(DEFAULT_GEOMETRY),
            self.runtime.handle().clone(),
        )
    }
}
