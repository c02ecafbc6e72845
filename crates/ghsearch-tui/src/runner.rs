// Browse session: load, display, navigate
use crate::layout::Panes;
use crate::opener::{SystemBrowser, UrlOpener};
use crate::progress::{run_with_progress, ProgressSink, ProgressTask, StatusLine};
use crate::screen::{install_panic_hook, CrosstermScreen, Screen};
use crate::session::{transition, BrowseState, Effect, InputEvent};
use crate::table::write_table;
use crate::ui::{self, Notice, View};
use ghsearch_core::{Browsable, PageFetcher};
use ratatui::layout::Rect;
use std::io::Write;
use std::mem;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const LOADING_LABEL: &str = "loading";

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Rows per page, used for rank labels
    pub page_size: usize,
    /// How long "no result" stays on screen before the session ends
    pub empty_pause: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            page_size: 30,
            empty_pause: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Displaying,
    Reloading,
    Terminated,
}

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    /// Ctrl+C; the caller should exit with status 130
    ForceQuit,
    /// The fetch came back with no rows
    Empty,
    /// A picker session ended on `enter` over this row
    Picked(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationMode {
    #[default]
    Interactive,
    /// Print the ranked rows once and return
    Table,
}

enum Source<R> {
    Paged(Arc<dyn PageFetcher<R>>),
    /// Pre-fetched rows per tab; the shown tab's rows live in `Session::rows`
    Tabbed(Vec<Vec<R>>),
}

pub struct Session<R> {
    title: String,
    source: Source<R>,
    tab_names: Vec<String>,
    shown_tab: usize,
    rows: Vec<R>,
    state: BrowseState,
    panes: Option<Panes>,
    phase: Phase,
    notice: Option<Notice>,
    /// `enter` ends the session with the selected row instead of opening it
    picker: bool,
    options: SessionOptions,
}

impl<R> Session<R>
where
    R: Browsable + Send + 'static,
{
    /// Session over a paged fetch, starting at `page`
    pub fn paged(
        title: impl Into<String>,
        fetcher: Arc<dyn PageFetcher<R>>,
        page: u32,
        options: SessionOptions,
    ) -> Self {
        Self {
            title: title.into(),
            source: Source::Paged(fetcher),
            tab_names: Vec::new(),
            shown_tab: 0,
            rows: Vec::new(),
            state: BrowseState::paged(page, 0),
            panes: None,
            phase: Phase::Loading,
            notice: None,
            picker: false,
            options,
        }
    }

    /// Session over rows fetched up front, one list per tab
    pub fn tabbed(
        title: impl Into<String>,
        tabs: Vec<(String, Vec<R>)>,
        options: SessionOptions,
    ) -> Self {
        let (tab_names, mut lists): (Vec<String>, Vec<Vec<R>>) = tabs.into_iter().unzip();
        let rows = lists.first_mut().map(mem::take).unwrap_or_default();

        Self {
            title: title.into(),
            state: BrowseState::tabbed(tab_names.len(), rows.len()),
            source: Source::Tabbed(lists),
            tab_names,
            shown_tab: 0,
            rows,
            panes: None,
            phase: Phase::Displaying,
            notice: None,
            picker: false,
            options,
        }
    }

    /// Single list to choose one row from; ends with [`SessionEnd::Picked`]
    pub fn picker(title: impl Into<String>, rows: Vec<R>, options: SessionOptions) -> Self {
        Self {
            title: title.into(),
            state: BrowseState::tabbed(1, rows.len()),
            source: Source::Tabbed(vec![Vec::new()]),
            tab_names: Vec::new(),
            shown_tab: 0,
            rows,
            panes: None,
            phase: Phase::Displaying,
            notice: None,
            picker: true,
            options,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn panes(&self) -> Option<Panes> {
        self.panes
    }

    /// Fetch the start page if it has not been fetched yet
    pub async fn load<S: ProgressSink + ?Sized>(&mut self, sink: &mut S) -> anyhow::Result<()> {
        // Only paged sessions start out loading
        let (Phase::Loading, Source::Paged(fetcher)) = (self.phase, &self.source) else {
            return Ok(());
        };
        let page = self.state.page;
        let rows = fetch_page(Arc::clone(fetcher), page, sink).await?;
        self.show_rows(page, rows);
        Ok(())
    }

    fn show_rows(&mut self, page: u32, rows: Vec<R>) {
        debug!("showing {} rows on page {}", rows.len(), page);
        self.rows = rows;
        self.state.show_page(page, self.rows.len());
        self.phase = Phase::Displaying;
    }

    /// Drive the interactive loop until the user leaves or nothing is left to show
    pub async fn run<S, O>(&mut self, screen: &mut S, opener: &O) -> anyhow::Result<SessionEnd>
    where
        S: Screen + ?Sized,
        O: UrlOpener + ?Sized,
    {
        self.relayout(screen.area()?);

        if self.phase == Phase::Loading {
            let page = self.state.page;
            self.reload(screen, page).await?;
        }

        loop {
            if self.rows.is_empty() {
                return self.finish_empty(screen).await;
            }

            self.draw(screen, self.notice.as_ref())?;

            let event = screen.next_event()?;
            let (next, effect) = transition(&self.state, event);
            self.state = next;
            if let InputEvent::Key(_) = event {
                self.notice = None;
            }

            match effect {
                Effect::None | Effect::Render => {}
                Effect::Fetch { page } => self.reload(screen, page).await?,
                Effect::Open { index } if self.picker => {
                    self.phase = Phase::Terminated;
                    screen.clear()?;
                    return Ok(SessionEnd::Picked(index));
                }
                Effect::Open { index } => self.open(index, opener),
                Effect::SwitchTab { tab } => self.switch_tab(tab),
                Effect::Relayout { width, height } => {
                    self.relayout(Rect::new(0, 0, width, height))
                }
                Effect::Quit => {
                    self.phase = Phase::Terminated;
                    screen.clear()?;
                    return Ok(SessionEnd::Quit);
                }
                Effect::ForceQuit => {
                    self.phase = Phase::Terminated;
                    return Ok(SessionEnd::ForceQuit);
                }
            }
        }
    }

    async fn reload<S: Screen + ?Sized>(&mut self, screen: &mut S, page: u32) -> anyhow::Result<()> {
        let fetcher = match &self.source {
            Source::Paged(fetcher) => Arc::clone(fetcher),
            Source::Tabbed(_) => return Ok(()),
        };
        self.phase = Phase::Reloading;

        let rows = {
            let mut indicator = ReloadIndicator {
                session: &*self,
                screen,
            };
            fetch_page(fetcher, page, &mut indicator).await?
        };

        self.show_rows(page, rows);
        Ok(())
    }

    fn relayout(&mut self, area: Rect) {
        match Panes::compute(area) {
            Some(panes) => {
                self.state.set_viewport(panes.list_rows());
                self.panes = Some(panes);
            }
            None => debug!(
                "terminal {}x{} too small, keeping previous layout",
                area.width, area.height
            ),
        }
    }

    fn open<O: UrlOpener + ?Sized>(&mut self, index: usize, opener: &O) {
        let Some(row) = self.rows.get(index) else {
            return;
        };
        let url = row.url();

        self.notice = match opener.open(url) {
            Ok(()) => {
                info!("opened {}", url);
                Some(Notice::Info(format!("open {}", url)))
            }
            Err(e) => {
                warn!("failed to open {}: {:#}", url, e);
                Some(Notice::Error(format!("{:#}", e)))
            }
        };
    }

    fn switch_tab(&mut self, tab: usize) {
        let Source::Tabbed(lists) = &mut self.source else {
            return;
        };
        if tab >= lists.len() || tab == self.shown_tab {
            return;
        }

        lists[self.shown_tab] = mem::take(&mut self.rows);
        self.rows = mem::take(&mut lists[tab]);
        self.shown_tab = tab;
        self.state.replace_rows(self.rows.len());
    }

    async fn finish_empty<S: Screen + ?Sized>(&mut self, screen: &mut S) -> anyhow::Result<SessionEnd> {
        info!("no result on page {}", self.state.page);
        self.phase = Phase::Terminated;
        screen.draw(&mut |f| ui::render_empty(f))?;
        tokio::time::sleep(self.options.empty_pause).await;
        screen.clear()?;
        Ok(SessionEnd::Empty)
    }

    fn draw<S: Screen + ?Sized>(&self, screen: &mut S, notice: Option<&Notice>) -> anyhow::Result<()> {
        let view = View {
            title: &self.title,
            tabs: &self.tab_names,
            rows: &self.rows,
            state: &self.state,
            page_size: self.options.page_size,
            notice,
            picker: self.picker,
        };
        let panes = self.panes;

        screen.draw(&mut |f| match &panes {
            Some(panes) => ui::render(f, panes, &view),
            None => ui::render_too_small(f),
        })
    }

    /// Non-interactive listing of the loaded rows; tabbed sessions print every tab
    pub fn write_table<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let page_size = self.options.page_size;
        match &self.source {
            Source::Paged(_) => {
                if self.rows.is_empty() {
                    writeln!(out, "no result")?;
                }
                write_table(&self.rows, self.state.page, page_size, out)
            }
            Source::Tabbed(lists) => {
                for (i, name) in self.tab_names.iter().enumerate() {
                    let rows = if i == self.shown_tab { &self.rows } else { &lists[i] };
                    writeln!(out, "{}", name)?;
                    if rows.is_empty() {
                        writeln!(out, "no result")?;
                    }
                    write_table(rows, 1, page_size, out)?;
                }
                Ok(())
            }
        }
    }
}

async fn fetch_page<R, S>(
    fetcher: Arc<dyn PageFetcher<R>>,
    page: u32,
    sink: &mut S,
) -> ghsearch_core::Result<Vec<R>>
where
    R: Send + 'static,
    S: ProgressSink + ?Sized,
{
    debug!("fetching page {}", page);
    run_with_progress(LOADING_LABEL, async move { fetcher.fetch_page(page).await }, sink).await
}

/// Draws the progress status in the help line while a page is fetched
struct ReloadIndicator<'a, R, S: ?Sized> {
    session: &'a Session<R>,
    screen: &'a mut S,
}

impl<R, S> ProgressSink for ReloadIndicator<'_, R, S>
where
    R: Browsable + Send + 'static,
    S: Screen + ?Sized,
{
    fn draw(&mut self, task: &ProgressTask) {
        let notice = Notice::Info(task.status_line());
        if let Err(e) = self.session.draw(self.screen, Some(&notice)) {
            debug!("reload indicator draw failed: {}", e);
        }
    }

    fn clear(&mut self) {
        if let Err(e) = self.session.draw(self.screen, None) {
            debug!("reload indicator clear failed: {}", e);
        }
    }
}

/// Load `session`, then either browse it in the terminal or print it.
///
/// The terminal is released before this returns, including on force quit.
pub async fn present<R>(
    mut session: Session<R>,
    mode: PresentationMode,
) -> anyhow::Result<SessionEnd>
where
    R: Browsable + Send + 'static,
{
    let mut status = StatusLine::stderr();
    session.load(&mut status).await?;

    match mode {
        PresentationMode::Table => {
            let stdout = std::io::stdout();
            session.write_table(&mut stdout.lock())?;
            if session.rows().is_empty() {
                Ok(SessionEnd::Empty)
            } else {
                Ok(SessionEnd::Quit)
            }
        }
        PresentationMode::Interactive => {
            install_panic_hook();
            let mut screen = CrosstermScreen::acquire()?;
            let end = session.run(&mut screen, &SystemBrowser).await;
            settle(end, screen.release())
        }
    }
}

/// The session's own error wins over a failed terminal restore
fn settle(
    end: anyhow::Result<SessionEnd>,
    release: anyhow::Result<()>,
) -> anyhow::Result<SessionEnd> {
    match (end, release) {
        (end, Ok(())) => end,
        (Ok(_), Err(release)) => Err(release),
        (Err(e), Err(release)) => {
            warn!("failed to restore terminal: {:#}", release);
            Err(e)
        }
    }
}
