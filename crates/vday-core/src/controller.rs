//! Navigation & playback controller for the slideshow.
//!
//! One [`Slideshow`] per open page. It owns the current page index and the
//! state of the single narration handle; operations return [`MediaCommand`]s
//! for the media layer to execute, and media events come back in through the
//! `playback_*` methods, which only perform state transitions. The render
//! target is the [`View`] snapshot, the analogue of the page's DOM.

use serde::Serialize;

use crate::pages::{FIRST_YEAR, LATEST_YEAR, PAGE_ORDER, PageId, narration_label, narration_source};

/// Lifecycle of the one narration handle, tagged with the year it plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Narration {
    /// No handle exists.
    Absent,
    /// A handle was just created; the media layer has not confirmed playback.
    Loading { year: u16 },
    /// Audible (confirmed start, or a resume).
    Playing { year: u16 },
    /// Paused mid-track; position retained.
    Paused { year: u16 },
}

impl Narration {
    /// The year the handle belongs to, if one exists.
    pub fn year(self) -> Option<u16> {
        match self {
            Narration::Absent => None,
            Narration::Loading { year } | Narration::Playing { year } | Narration::Paused { year } => {
                Some(year)
            }
        }
    }

    /// True for the states that show the "pause" affordance.
    pub fn is_audible(self) -> bool {
        matches!(self, Narration::Loading { .. } | Narration::Playing { .. })
    }
}

/// Side effect for the media layer. The controller never touches audio
/// itself; it describes what should happen to the one live handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaCommand {
    /// Create a fresh handle for `source` and start it.
    Play { year: u16, source: String },
    Pause,
    Resume,
    /// Discard the current handle entirely.
    Stop,
}

/// Active flag for one page or dot element, keyed by the page id.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub id: PageId,
    pub active: bool,
}

/// Prev/next arrow: enabled state plus the adjacent-year caption
/// (blank for the reflections page or past the ends).
#[derive(Debug, Clone, Serialize)]
pub struct NavButton {
    pub enabled: bool,
    pub year_label: String,
}

/// The narration toggle.
#[derive(Debug, Clone, Serialize)]
pub struct NarrationButton {
    pub label: String,
    pub playing: bool,
    /// False when the year has no narration clip.
    pub enabled: bool,
}

/// Render-target snapshot: everything the page draws.
#[derive(Debug, Clone, Serialize)]
pub struct View {
    pub pages: Vec<Marker>,
    pub dots: Vec<Marker>,
    pub prev: NavButton,
    pub next: NavButton,
    /// `None` on the reflections page; the control is hidden there.
    pub narration: Option<NarrationButton>,
    pub year_nav_hidden: bool,
    pub reflections_nav_active: bool,
}

/// The slideshow session.
#[derive(Debug)]
pub struct Slideshow {
    pages: &'static [PageId],
    index: usize,
    narration: Narration,
}

impl Default for Slideshow {
    fn default() -> Self {
        Self::new()
    }
}

impl Slideshow {
    /// A fresh session, opened on the first year page.
    pub fn new() -> Self {
        Self {
            pages: &PAGE_ORDER,
            index: 0,
            narration: Narration::Absent,
        }
    }

    pub fn current_page(&self) -> PageId {
        self.pages[self.index]
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_year(&self) -> Option<u16> {
        self.current_page().year()
    }

    pub fn narration(&self) -> Narration {
        self.narration
    }

    // ─── Navigation ────────────────────────────────────────────────────

    /// Jump to a page by id. Unknown ids are ignored. Any audible narration
    /// is paused (and kept, so coming back to its year resumes mid-track).
    pub fn show_page(&mut self, id: PageId) -> Vec<MediaCommand> {
        let Some(index) = self.pages.iter().position(|p| *p == id) else {
            return Vec::new();
        };
        self.index = index;
        match self.narration {
            Narration::Loading { year } | Narration::Playing { year } => {
                self.narration = Narration::Paused { year };
                vec![MediaCommand::Pause]
            }
            Narration::Paused { .. } | Narration::Absent => Vec::new(),
        }
    }

    /// Step back one page; no-op on the first page.
    pub fn go_prev(&mut self) -> Vec<MediaCommand> {
        if self.index > 0 {
            self.show_page(self.pages[self.index - 1])
        } else {
            Vec::new()
        }
    }

    /// Step forward one page; no-op on the last page.
    pub fn go_next(&mut self) -> Vec<MediaCommand> {
        if self.index + 1 < self.pages.len() {
            self.show_page(self.pages[self.index + 1])
        } else {
            Vec::new()
        }
    }

    /// Shortcut back to the first year.
    pub fn go_to_beginning(&mut self) -> Vec<MediaCommand> {
        self.show_page(PageId::Year(FIRST_YEAR))
    }

    /// Shortcut to the most recent year page (not reflections).
    pub fn go_to_latest(&mut self) -> Vec<MediaCommand> {
        self.show_page(PageId::Year(LATEST_YEAR))
    }

    // ─── Narration ─────────────────────────────────────────────────────

    /// Play/pause the current year's narration.
    ///
    /// No-op on pages without a clip. A paused handle for the same year
    /// resumes where it left off; a handle for another year is discarded
    /// before the new one starts.
    pub fn toggle_narration(&mut self) -> Vec<MediaCommand> {
        let Some(year) = self.current_year() else {
            return Vec::new();
        };
        let Some(source) = narration_source(year) else {
            return Vec::new();
        };
        match self.narration {
            Narration::Loading { year: owned } | Narration::Playing { year: owned }
                if owned == year =>
            {
                self.narration = Narration::Paused { year };
                vec![MediaCommand::Pause]
            }
            Narration::Paused { year: owned } if owned == year => {
                self.narration = Narration::Playing { year };
                vec![MediaCommand::Resume]
            }
            Narration::Absent => {
                self.narration = Narration::Loading { year };
                vec![MediaCommand::Play {
                    year,
                    source: source.to_string(),
                }]
            }
            _ => {
                self.narration = Narration::Loading { year };
                vec![
                    MediaCommand::Stop,
                    MediaCommand::Play {
                        year,
                        source: source.to_string(),
                    },
                ]
            }
        }
    }

    // ─── Media events ──────────────────────────────────────────────────

    /// The media layer confirmed playback started for `year`.
    pub fn playback_started(&mut self, year: u16) {
        if let Narration::Loading { year: owned } = self.narration {
            if owned == year {
                self.narration = Narration::Playing { year };
            }
        }
    }

    /// The clip for `year` finished on its own; the handle is gone.
    /// Events for a year that no longer owns the handle are stale and ignored.
    pub fn playback_ended(&mut self, year: u16) {
        if self.narration.year() == Some(year) {
            self.narration = Narration::Absent;
        }
    }

    /// The clip for `year` failed to load or play. Fail quiet: the handle
    /// resets and the button returns to its idle label.
    pub fn playback_failed(&mut self, year: u16) {
        if self.narration.year() == Some(year) {
            self.narration = Narration::Absent;
        }
    }

    // ─── Render target ─────────────────────────────────────────────────

    /// Snapshot of everything the page draws.
    pub fn view(&self) -> View {
        let current = self.current_page();

        let pages: Vec<Marker> = self
            .pages
            .iter()
            .map(|p| Marker {
                id: *p,
                active: *p == current,
            })
            .collect();
        let dots = pages.clone();

        let prev_page = (self.index > 0).then(|| self.pages[self.index - 1]);
        let next_page = (self.index + 1 < self.pages.len()).then(|| self.pages[self.index + 1]);

        let narration = match current {
            PageId::Reflections => None,
            PageId::Year(year) => {
                let has_clip = narration_source(year).is_some();
                let playing =
                    has_clip && self.narration.is_audible() && self.narration.year() == Some(year);
                Some(NarrationButton {
                    label: narration_label(year, playing),
                    playing,
                    enabled: has_clip,
                })
            }
        };

        View {
            pages,
            dots,
            prev: NavButton {
                enabled: prev_page.is_some(),
                year_label: adjacent_year_label(prev_page),
            },
            next: NavButton {
                enabled: next_page.is_some(),
                year_label: adjacent_year_label(next_page),
            },
            narration,
            year_nav_hidden: current.is_reflections(),
            reflections_nav_active: current.is_reflections(),
        }
    }
}

/// Caption under a prev/next arrow: the adjacent year, or blank when the
/// neighbor is the reflections page or does not exist.
fn adjacent_year_label(page: Option<PageId>) -> String {
    page.and_then(PageId::year)
        .map(|year| year.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::PAGE_ORDER;

    fn active_ids(markers: &[Marker]) -> Vec<PageId> {
        markers.iter().filter(|m| m.active).map(|m| m.id).collect()
    }

    #[test]
    fn opens_on_2018() {
        let show = Slideshow::new();
        assert_eq!(show.current_page(), PageId::Year(2018));
        assert_eq!(show.current_index(), 0);
        assert_eq!(show.narration(), Narration::Absent);
    }

    #[test]
    fn every_page_shows_exactly_one_active_marker() {
        let mut show = Slideshow::new();
        for page in PAGE_ORDER {
            show.show_page(page);
            let view = show.view();
            assert_eq!(active_ids(&view.pages), vec![page]);
            assert_eq!(active_ids(&view.dots), vec![page]);
        }
    }

    #[test]
    fn unknown_page_is_ignored() {
        let mut show = Slideshow::new();
        show.show_page(PageId::Year(2020));
        let commands = show.show_page(PageId::Year(1999));
        assert!(commands.is_empty());
        assert_eq!(show.current_page(), PageId::Year(2020));
    }

    #[test]
    fn prev_at_the_start_is_a_noop() {
        let mut show = Slideshow::new();
        assert!(show.go_prev().is_empty());
        assert_eq!(show.current_index(), 0);
    }

    #[test]
    fn next_at_the_end_is_a_noop() {
        let mut show = Slideshow::new();
        show.show_page(PageId::Reflections);
        assert!(show.go_next().is_empty());
        assert_eq!(show.current_page(), PageId::Reflections);
    }

    #[test]
    fn arrows_disable_exactly_at_the_boundaries() {
        let mut show = Slideshow::new();

        let view = show.view();
        assert!(!view.prev.enabled);
        assert!(view.next.enabled);
        assert_eq!(view.next.year_label, "2019");

        show.show_page(PageId::Reflections);
        let view = show.view();
        assert!(view.prev.enabled);
        assert_eq!(view.prev.year_label, "2025");
        assert!(!view.next.enabled);
        assert_eq!(view.next.year_label, "");
    }

    #[test]
    fn next_caption_is_blank_before_reflections() {
        let mut show = Slideshow::new();
        show.show_page(PageId::Year(2025));
        let view = show.view();
        assert!(view.next.enabled);
        assert_eq!(view.next.year_label, "");
        assert_eq!(view.prev.year_label, "2024");
    }

    #[test]
    fn toggle_starts_then_pauses_one_handle() {
        let mut show = Slideshow::new();

        let first = show.toggle_narration();
        assert_eq!(
            first,
            vec![MediaCommand::Play {
                year: 2018,
                source: "audio/2018_vday.mp3".to_string(),
            }]
        );
        assert_eq!(show.narration(), Narration::Loading { year: 2018 });

        // Second toggle pauses the same handle, never a second Play.
        let second = show.toggle_narration();
        assert_eq!(second, vec![MediaCommand::Pause]);
        assert_eq!(show.narration(), Narration::Paused { year: 2018 });
    }

    #[test]
    fn third_toggle_resumes_the_same_handle() {
        let mut show = Slideshow::new();
        show.toggle_narration();
        show.toggle_narration();
        let third = show.toggle_narration();
        assert_eq!(third, vec![MediaCommand::Resume]);
        assert_eq!(show.narration(), Narration::Playing { year: 2018 });
    }

    #[test]
    fn toggle_flips_the_first_year_label() {
        let mut show = Slideshow::new();
        assert_eq!(show.view().narration.unwrap().label, "The beginning of Bahbs");
        show.toggle_narration();
        let button = show.view().narration.unwrap();
        assert_eq!(button.label, "Pause the beginning of Bahbs");
        assert!(button.playing);
    }

    #[test]
    fn navigation_pauses_live_narration() {
        let mut show = Slideshow::new();
        show.toggle_narration();
        show.playback_started(2018);

        let commands = show.go_next();
        assert_eq!(commands, vec![MediaCommand::Pause]);
        assert_eq!(show.narration(), Narration::Paused { year: 2018 });

        let button = show.view().narration.unwrap();
        assert_eq!(button.label, "Listen to V-Day in 2019");
        assert!(!button.playing);
    }

    #[test]
    fn returning_to_the_paused_year_resumes() {
        let mut show = Slideshow::new();
        show.toggle_narration();
        show.playback_started(2018);
        show.go_next();
        show.go_prev();

        let commands = show.toggle_narration();
        assert_eq!(commands, vec![MediaCommand::Resume]);
        assert_eq!(show.narration(), Narration::Playing { year: 2018 });
    }

    #[test]
    fn playing_a_different_year_replaces_the_handle() {
        let mut show = Slideshow::new();
        show.toggle_narration();
        show.playback_started(2018);
        show.go_next();

        let commands = show.toggle_narration();
        assert_eq!(
            commands,
            vec![
                MediaCommand::Stop,
                MediaCommand::Play {
                    year: 2019,
                    source: "audio/2019_vday.mp3".to_string(),
                },
            ]
        );
        assert_eq!(show.narration(), Narration::Loading { year: 2019 });
    }

    #[test]
    fn started_confirms_a_loading_handle() {
        let mut show = Slideshow::new();
        show.toggle_narration();
        show.playback_started(2018);
        assert_eq!(show.narration(), Narration::Playing { year: 2018 });
    }

    #[test]
    fn stale_started_is_ignored() {
        let mut show = Slideshow::new();
        show.toggle_narration();
        show.playback_started(2019);
        assert_eq!(show.narration(), Narration::Loading { year: 2018 });
    }

    #[test]
    fn natural_end_clears_the_handle() {
        let mut show = Slideshow::new();
        show.toggle_narration();
        show.playback_started(2018);
        show.playback_ended(2018);
        assert_eq!(show.narration(), Narration::Absent);

        // The next toggle starts a fresh handle.
        let commands = show.toggle_narration();
        assert!(matches!(&commands[..], [MediaCommand::Play { year: 2018, .. }]));
    }

    #[test]
    fn stale_end_is_ignored() {
        let mut show = Slideshow::new();
        show.toggle_narration();
        show.go_next();
        show.toggle_narration(); // handle now belongs to 2019
        show.playback_ended(2018);
        assert_eq!(show.narration(), Narration::Loading { year: 2019 });
    }

    #[test]
    fn playback_error_resets_quietly() {
        let mut show = Slideshow::new();
        show.toggle_narration();
        show.playback_failed(2018);
        assert_eq!(show.narration(), Narration::Absent);

        let button = show.view().narration.unwrap();
        assert_eq!(button.label, "The beginning of Bahbs");
        assert!(!button.playing);
    }

    #[test]
    fn reflections_hides_narration_and_swaps_navs() {
        let mut show = Slideshow::new();
        show.show_page(PageId::Reflections);

        let view = show.view();
        assert!(view.narration.is_none());
        assert!(view.year_nav_hidden);
        assert!(view.reflections_nav_active);
        assert!(show.toggle_narration().is_empty());

        show.show_page(PageId::Year(2019));
        let view = show.view();
        assert!(view.narration.is_some());
        assert!(!view.year_nav_hidden);
        assert!(!view.reflections_nav_active);
    }

    #[test]
    fn shortcuts_jump_from_reflections() {
        let mut show = Slideshow::new();
        show.show_page(PageId::Reflections);
        show.go_to_latest();
        assert_eq!(show.current_page(), PageId::Year(2025));

        show.show_page(PageId::Reflections);
        show.go_to_beginning();
        assert_eq!(show.current_page(), PageId::Year(2018));
    }

    #[test]
    fn view_serializes_with_page_id_strings() {
        let show = Slideshow::new();
        let json = serde_json::to_string(&show.view()).unwrap();
        assert!(json.contains("\"2018\""));
        assert!(json.contains("\"reflections\""));
    }
}
