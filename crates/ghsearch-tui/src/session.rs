//! Browse session state machine.
//!
//! Terminal-agnostic: input arrives as [`InputEvent`]s, and every transition is
//! a pure function from one [`BrowseState`] to the next plus an [`Effect`]
//! describing what the runner has to do (render, fetch, open, quit...).

/// Key classes understood by the browse session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyToken {
    Quit,
    ForceQuit,
    Down,
    Up,
    HalfPageDown,
    HalfPageUp,
    PageDown,
    PageUp,
    /// Fires "go to top" only when pressed twice in a row
    ChordTop,
    Home,
    Bottom,
    NextPage,
    PrevPage,
    Open,
    TabLeft,
    TabRight,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyToken),
    Resize { width: u16, height: u16 },
}

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Render,
    Fetch { page: u32 },
    Open { index: usize },
    SwitchTab { tab: usize },
    Relayout { width: u16, height: u16 },
    Quit,
    ForceQuit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseState {
    /// 1-based page of a paged session
    pub page: u32,
    pub selected: usize,
    /// First visible row of the list
    pub scroll: usize,
    /// Pending chord key, if the last key was one
    pub previous_key: Option<KeyToken>,
    /// Number of rows currently loaded
    pub len: usize,
    /// Visible list rows, at least 1
    pub viewport: usize,
    pub paged: bool,
    pub tab: usize,
    pub tab_count: usize,
}

impl BrowseState {
    pub fn paged(page: u32, len: usize) -> Self {
        Self {
            page: page.max(1),
            selected: 0,
            scroll: 0,
            previous_key: None,
            len,
            viewport: 1,
            paged: true,
            tab: 0,
            tab_count: 0,
        }
    }

    pub fn tabbed(tab_count: usize, len: usize) -> Self {
        Self {
            page: 1,
            paged: false,
            tab_count,
            ..Self::paged(1, len)
        }
    }

    /// Rows of `page` arrived
    pub fn show_page(&mut self, page: u32, len: usize) {
        self.page = page.max(1);
        self.replace_rows(len);
    }

    /// New rows arrived (page change or tab switch): back to the top
    pub fn replace_rows(&mut self, len: usize) {
        self.len = len;
        self.selected = 0;
        self.scroll = 0;
    }

    pub fn set_viewport(&mut self, rows: usize) {
        self.viewport = rows.max(1);
        self.follow_selection();
    }

    fn half_page(&self) -> isize {
        (self.viewport / 2).max(1) as isize
    }

    fn full_page(&self) -> isize {
        self.viewport.max(1) as isize
    }

    fn move_by(&mut self, delta: isize) -> Effect {
        if self.len == 0 {
            return Effect::None;
        }
        let last = self.len - 1;
        let target = (self.selected as isize + delta).clamp(0, last as isize) as usize;
        self.jump_to(target)
    }

    fn jump_to(&mut self, index: usize) -> Effect {
        if self.len == 0 {
            return Effect::None;
        }
        self.selected = index.min(self.len - 1);
        self.follow_selection();
        Effect::Render
    }

    fn follow_selection(&mut self) {
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + self.viewport {
            self.scroll = self.selected + 1 - self.viewport;
        }
    }
}

type Transition = fn(&mut BrowseState) -> Effect;

fn quit(_: &mut BrowseState) -> Effect {
    Effect::Quit
}

fn force_quit(_: &mut BrowseState) -> Effect {
    Effect::ForceQuit
}

fn down(s: &mut BrowseState) -> Effect {
    s.move_by(1)
}

fn up(s: &mut BrowseState) -> Effect {
    s.move_by(-1)
}

fn half_page_down(s: &mut BrowseState) -> Effect {
    let step = s.half_page();
    s.move_by(step)
}

fn half_page_up(s: &mut BrowseState) -> Effect {
    let step = s.half_page();
    s.move_by(-step)
}

fn page_down(s: &mut BrowseState) -> Effect {
    let step = s.full_page();
    s.move_by(step)
}

fn page_up(s: &mut BrowseState) -> Effect {
    let step = s.full_page();
    s.move_by(-step)
}

fn top(s: &mut BrowseState) -> Effect {
    s.jump_to(0)
}

fn bottom(s: &mut BrowseState) -> Effect {
    let last = s.len.saturating_sub(1);
    s.jump_to(last)
}

// `page` only moves once the runner has the new rows, so the old rows keep
// their ranks while the fetch is in flight.
fn next_page(s: &mut BrowseState) -> Effect {
    match s.page.checked_add(1) {
        Some(page) if s.paged => Effect::Fetch { page },
        _ => Effect::None,
    }
}

fn previous_page(s: &mut BrowseState) -> Effect {
    if !s.paged || s.page <= 1 {
        return Effect::None;
    }
    Effect::Fetch { page: s.page - 1 }
}

fn open(s: &mut BrowseState) -> Effect {
    if s.len == 0 {
        return Effect::None;
    }
    Effect::Open { index: s.selected }
}

fn switch_tab(s: &mut BrowseState, forward: bool) -> Effect {
    if s.paged || s.tab_count < 2 {
        return Effect::None;
    }
    s.tab = if forward {
        (s.tab + 1) % s.tab_count
    } else {
        (s.tab + s.tab_count - 1) % s.tab_count
    };
    Effect::SwitchTab { tab: s.tab }
}

fn tab_left(s: &mut BrowseState) -> Effect {
    switch_tab(s, false)
}

fn tab_right(s: &mut BrowseState) -> Effect {
    switch_tab(s, true)
}

fn ignore(_: &mut BrowseState) -> Effect {
    Effect::None
}

/// Key dispatch table. `ChordTop` is resolved before the table is consulted.
fn transition_for(key: KeyToken) -> Transition {
    match key {
        KeyToken::Quit => quit,
        KeyToken::ForceQuit => force_quit,
        KeyToken::Down => down,
        KeyToken::Up => up,
        KeyToken::HalfPageDown => half_page_down,
        KeyToken::HalfPageUp => half_page_up,
        KeyToken::PageDown => page_down,
        KeyToken::PageUp => page_up,
        KeyToken::Home => top,
        KeyToken::Bottom => bottom,
        KeyToken::NextPage => next_page,
        KeyToken::PrevPage => previous_page,
        KeyToken::Open => open,
        KeyToken::TabLeft => tab_left,
        KeyToken::TabRight => tab_right,
        KeyToken::ChordTop | KeyToken::Other => ignore,
    }
}

/// Apply one input event
pub fn transition(state: &BrowseState, event: InputEvent) -> (BrowseState, Effect) {
    let mut next = state.clone();

    let effect = match event {
        InputEvent::Resize { width, height } => Effect::Relayout { width, height },
        InputEvent::Key(key) => {
            let pending = next.previous_key.take();
            if key == KeyToken::ChordTop {
                if pending == Some(KeyToken::ChordTop) {
                    top(&mut next)
                } else {
                    next.previous_key = Some(KeyToken::ChordTop);
                    Effect::None
                }
            } else {
                transition_for(key)(&mut next)
            }
        }
    };

    (next, effect)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(state: &BrowseState, key: KeyToken) -> (BrowseState, Effect) {
        transition(state, InputEvent::Key(key))
    }

    fn press_all(state: &BrowseState, keys: &[KeyToken]) -> BrowseState {
        keys.iter().fold(state.clone(), |s, k| press(&s, *k).0)
    }

    fn viewed(len: usize, viewport: usize) -> BrowseState {
        let mut s = BrowseState::paged(1, len);
        s.set_viewport(viewport);
        s
    }

    #[test]
    fn test_up_clamps_at_zero() {
        let s = viewed(5, 10);
        let s = press_all(&s, &[KeyToken::Up; 10]);
        assert_eq!(s.selected, 0);
    }

    #[test]
    fn test_down_never_passes_last_row() {
        let mut s = viewed(5, 3);
        for step in 0..20 {
            s = press(&s, KeyToken::Down).0;
            assert!(s.selected <= 4, "step {step}");
            assert!(s.scroll <= s.selected);
            assert!(s.selected < s.scroll + s.viewport);
        }
        assert_eq!(s.selected, 4);
        assert_eq!(s.scroll, 2);
    }

    #[test]
    fn test_navigation_on_empty_rows_is_noop() {
        let s = viewed(0, 10);
        for key in [KeyToken::Down, KeyToken::Bottom, KeyToken::PageDown, KeyToken::Open] {
            let (next, effect) = press(&s, key);
            assert_eq!(effect, Effect::None);
            assert_eq!(next.selected, 0);
        }
    }

    #[test]
    fn test_half_and_full_page_steps() {
        let s = viewed(50, 10);
        let s = press(&s, KeyToken::HalfPageDown).0;
        assert_eq!(s.selected, 5);
        let s = press(&s, KeyToken::PageDown).0;
        assert_eq!(s.selected, 15);
        let s = press(&s, KeyToken::HalfPageUp).0;
        assert_eq!(s.selected, 10);
        let s = press_all(&s, &[KeyToken::PageUp, KeyToken::PageUp]);
        assert_eq!(s.selected, 0);
        let s = press_all(&s, &[KeyToken::PageDown; 10]);
        assert_eq!(s.selected, 49);
    }

    #[test]
    fn test_bottom_and_home() {
        let s = viewed(8, 3);
        let (s, effect) = press(&s, KeyToken::Bottom);
        assert_eq!(effect, Effect::Render);
        assert_eq!(s.selected, 7);
        assert_eq!(s.scroll, 5);
        let s = press(&s, KeyToken::Home).0;
        assert_eq!(s.selected, 0);
        assert_eq!(s.scroll, 0);
    }

    #[test]
    fn test_single_chord_key_does_nothing() {
        let s = press(&viewed(8, 10), KeyToken::Bottom).0;
        let (next, effect) = press(&s, KeyToken::ChordTop);
        assert_eq!(effect, Effect::None);
        assert_eq!(next.selected, 7);
        assert_eq!(next.previous_key, Some(KeyToken::ChordTop));
    }

    #[test]
    fn test_double_chord_key_jumps_to_top() {
        let s = press(&viewed(8, 10), KeyToken::Bottom).0;
        let s = press_all(&s, &[KeyToken::ChordTop, KeyToken::ChordTop]);
        assert_eq!(s.selected, 0);
        assert_eq!(s.previous_key, None);
    }

    #[test]
    fn test_interrupted_chord_does_not_fire() {
        let s = press(&viewed(8, 10), KeyToken::Bottom).0;
        let s = press_all(&s, &[KeyToken::ChordTop, KeyToken::Other, KeyToken::ChordTop]);
        assert_eq!(s.selected, 7);
        assert_eq!(s.previous_key, Some(KeyToken::ChordTop));

        let s = press_all(&s, &[KeyToken::Up, KeyToken::ChordTop]);
        assert_eq!(s.selected, 6);
    }

    #[test]
    fn test_triple_chord_fires_once() {
        let s = press(&viewed(8, 10), KeyToken::Bottom).0;
        let s = press_all(&s, &[KeyToken::ChordTop; 3]);
        assert_eq!(s.selected, 0);
        assert_eq!(s.previous_key, Some(KeyToken::ChordTop));
    }

    #[test]
    fn test_next_page_requests_fetch() {
        let s = press(&viewed(30, 10), KeyToken::Down).0;
        let (mut next, effect) = press(&s, KeyToken::NextPage);
        assert_eq!(effect, Effect::Fetch { page: 2 });
        // Still on page 1 until the rows are in
        assert_eq!(next.page, 1);
        assert_eq!(next.selected, 1);

        next.show_page(2, 12);
        assert_eq!(next.page, 2);
        assert_eq!(next.selected, 0);
        assert_eq!(next.scroll, 0);
        assert_eq!(next.len, 12);
    }

    #[test]
    fn test_previous_page_stops_at_one() {
        let s = viewed(30, 10);
        let (next, effect) = press(&s, KeyToken::PrevPage);
        assert_eq!(effect, Effect::None);
        assert_eq!(next.page, 1);

        let mut s = BrowseState::paged(3, 30);
        s.set_viewport(10);
        let (next, effect) = press(&s, KeyToken::PrevPage);
        assert_eq!(effect, Effect::Fetch { page: 2 });
        assert_eq!(next.page, 3);
    }

    #[test]
    fn test_next_page_on_last_possible_page_is_ignored() {
        let s = BrowseState::paged(u32::MAX, 5);
        let (next, effect) = press(&s, KeyToken::NextPage);
        assert_eq!(effect, Effect::None);
        assert_eq!(next.page, u32::MAX);

        let (_, effect) = press(&s, KeyToken::PrevPage);
        assert_eq!(effect, Effect::Fetch { page: u32::MAX - 1 });
    }

    #[test]
    fn test_open_targets_selection() {
        let s = press_all(&viewed(5, 10), &[KeyToken::Down, KeyToken::Down]);
        let (next, effect) = press(&s, KeyToken::Open);
        assert_eq!(effect, Effect::Open { index: 2 });
        assert_eq!(next.selected, s.selected);
    }

    #[test]
    fn test_quit_and_force_quit() {
        let s = viewed(5, 10);
        assert_eq!(press(&s, KeyToken::Quit).1, Effect::Quit);
        assert_eq!(press(&s, KeyToken::ForceQuit).1, Effect::ForceQuit);
    }

    #[test]
    fn test_tabs_wrap_and_pages_are_ignored() {
        let mut s = BrowseState::tabbed(3, 10);
        s.set_viewport(5);

        let (s, effect) = press(&s, KeyToken::TabLeft);
        assert_eq!(effect, Effect::SwitchTab { tab: 2 });
        let (s, effect) = press(&s, KeyToken::TabRight);
        assert_eq!(effect, Effect::SwitchTab { tab: 0 });

        let (s, effect) = press(&s, KeyToken::NextPage);
        assert_eq!(effect, Effect::None);
        assert_eq!(s.page, 1);
    }

    #[test]
    fn test_tab_keys_ignored_in_paged_session() {
        let s = viewed(5, 10);
        assert_eq!(press(&s, KeyToken::TabRight).1, Effect::None);
    }

    #[test]
    fn test_resize_requests_relayout() {
        let s = viewed(5, 10);
        let (next, effect) = transition(&s, InputEvent::Resize { width: 120, height: 40 });
        assert_eq!(effect, Effect::Relayout { width: 120, height: 40 });
        assert_eq!(next, s);
    }

    #[test]
    fn test_smaller_viewport_keeps_selection_visible() {
        let mut s = press_all(&viewed(40, 20), &[KeyToken::PageDown]);
        assert_eq!(s.selected, 20);
        s.set_viewport(5);
        assert!(s.selected >= s.scroll && s.selected < s.scroll + 5);
    }
}
