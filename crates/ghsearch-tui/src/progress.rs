// Run one long operation in the background while a status line ticks
use crossterm::{
    cursor::MoveToColumn,
    queue,
    terminal::{Clear, ClearType},
};
use std::future::Future;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Redraw interval of the status line
pub const TICK: Duration = Duration::from_millis(100);

/// Width of the dot indicator, dots plus padding
pub const INDICATOR_WIDTH: usize = 10;

/// A running operation as seen by the status line
#[derive(Debug, Clone)]
pub struct ProgressTask {
    label: String,
    started: Instant,
    ticks: u64,
}

impl ProgressTask {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            started: Instant::now(),
            ticks: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn tick(&mut self) {
        self.ticks += 1;
    }

    /// `label(1.2s).....     `
    pub fn status_line(&self) -> String {
        format!(
            "{}({:.1}s){}",
            self.label,
            self.elapsed().as_secs_f64(),
            indicator(self.ticks)
        )
    }
}

/// Rotating dots, always exactly `INDICATOR_WIDTH` characters
pub fn indicator(ticks: u64) -> String {
    let dots = (ticks % INDICATOR_WIDTH as u64) as usize;
    format!("{}{}", ".".repeat(dots), " ".repeat(INDICATOR_WIDTH - dots))
}

/// Where the progress status goes while an operation runs
pub trait ProgressSink {
    fn draw(&mut self, task: &ProgressTask);

    /// Remove whatever `draw` left behind
    fn clear(&mut self);
}

/// Single overwritten line on a plain terminal stream
pub struct StatusLine<W: Write> {
    out: W,
}

impl<W: Write> StatusLine<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl StatusLine<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> ProgressSink for StatusLine<W> {
    fn draw(&mut self, task: &ProgressTask) {
        // Status output is best effort; a closed stream must not fail the fetch.
        let _ = write!(self.out, "\r{}", task.status_line());
        let _ = self.out.flush();
    }

    fn clear(&mut self) {
        let _ = queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine));
        let _ = write!(self.out, "\r");
        let _ = self.out.flush();
    }
}

struct ClearOnDrop<'a, S: ProgressSink + ?Sized>(&'a mut S);

impl<S: ProgressSink + ?Sized> Drop for ClearOnDrop<'_, S> {
    fn drop(&mut self) {
        self.0.clear();
    }
}

/// Run `operation` on a background task, redrawing `sink` every tick until it
/// completes, and return its output untouched.
///
/// There is no timeout and no cancellation: an operation that never finishes
/// keeps the indicator spinning. The sink is cleared on every exit path.
pub async fn run_with_progress<O, Fut, S>(label: &str, operation: Fut, sink: &mut S) -> O
where
    O: Send + 'static,
    Fut: Future<Output = O> + Send + 'static,
    S: ProgressSink + ?Sized,
{
    let mut handle = tokio::spawn(operation);
    let mut task = ProgressTask::new(label);
    let mut guard = ClearOnDrop(sink);

    loop {
        guard.0.draw(&task);

        match tokio::time::timeout(TICK, &mut handle).await {
            Ok(Ok(output)) => return output,
            Ok(Err(err)) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Ok(Err(err)) => unreachable!("progress task is never aborted: {err}"),
            Err(_elapsed) => task.tick(),
        }
    }
}
