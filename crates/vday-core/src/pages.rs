//! Page order, narration sources, and narration button text.
//!
//! The slideshow is a fixed sequence: eight year pages (2018–2025) followed
//! by the closing "reflections" page. Everything here is shared data with no
//! state behind it; the controller and the server both read from it.

use std::fmt;

use serde::{Serialize, Serializer};

/// First narrated year. Its button text differs from every other year.
pub const FIRST_YEAR: u16 = 2018;

/// Most recent year page, the target of the "back to 2025" shortcut.
pub const LATEST_YEAR: u16 = 2025;

/// The narrated years, in page order.
pub const YEARS: [u16; 8] = [2018, 2019, 2020, 2021, 2022, 2023, 2024, 2025];

/// All pages in display order: years first, reflections last.
pub const PAGE_ORDER: [PageId; 9] = [
    PageId::Year(2018),
    PageId::Year(2019),
    PageId::Year(2020),
    PageId::Year(2021),
    PageId::Year(2022),
    PageId::Year(2023),
    PageId::Year(2024),
    PageId::Year(2025),
    PageId::Reflections,
];

/// One slide in the sequence: a year page or the closing reflections page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Year(u16),
    Reflections,
}

impl PageId {
    /// The year for a year page, `None` for reflections.
    pub fn year(self) -> Option<u16> {
        match self {
            PageId::Year(year) => Some(year),
            PageId::Reflections => None,
        }
    }

    pub fn is_reflections(self) -> bool {
        matches!(self, PageId::Reflections)
    }

    /// Parse a page id the way the page's dataset keys spell them:
    /// `"reflections"` or a four-digit year. Anything else is `None`.
    ///
    /// Parsing is lenient about membership: `2093` parses fine and is then
    /// rejected by [`Slideshow::show_page`](crate::controller::Slideshow).
    pub fn parse(s: &str) -> Option<PageId> {
        if s == "reflections" {
            return Some(PageId::Reflections);
        }
        if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
            return s.parse::<u16>().ok().map(PageId::Year);
        }
        None
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageId::Year(year) => write!(f, "{year}"),
            PageId::Reflections => f.write_str("reflections"),
        }
    }
}

impl Serialize for PageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Year → pre-recorded narration clip, relative to the site root.
/// A year missing from this table has no narration.
const NARRATION_SOURCES: [(u16, &str); 8] = [
    (2018, "audio/2018_vday.mp3"),
    (2019, "audio/2019_vday.mp3"),
    (2020, "audio/2020_vday.mp3"),
    (2021, "audio/2021_vday.mp3"),
    (2022, "audio/2022_vday.mp3"),
    (2023, "audio/2023_vday.mp3"),
    (2024, "audio/2024_vday.mp3"),
    (2025, "audio/2025_vday.mp3"),
];

/// Look up the narration clip for a year.
pub fn narration_source(year: u16) -> Option<&'static str> {
    NARRATION_SOURCES
        .iter()
        .find(|(y, _)| *y == year)
        .map(|(_, source)| *source)
}

/// Narration button text for a year, in its playing or idle form.
pub fn narration_label(year: u16, playing: bool) -> String {
    if year == FIRST_YEAR {
        if playing {
            "Pause the beginning of Bahbs".to_string()
        } else {
            "The beginning of Bahbs".to_string()
        }
    } else if playing {
        format!("Pause V-Day in {year}")
    } else {
        format!("Listen to V-Day in {year}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_order_is_years_then_reflections() {
        assert_eq!(PAGE_ORDER.len(), YEARS.len() + 1);
        for (page, year) in PAGE_ORDER.iter().zip(YEARS) {
            assert_eq!(*page, PageId::Year(year));
        }
        assert_eq!(PAGE_ORDER[PAGE_ORDER.len() - 1], PageId::Reflections);
    }

    #[test]
    fn parse_accepts_years_and_reflections() {
        assert_eq!(PageId::parse("2018"), Some(PageId::Year(2018)));
        assert_eq!(PageId::parse("2025"), Some(PageId::Year(2025)));
        assert_eq!(PageId::parse("reflections"), Some(PageId::Reflections));
    }

    #[test]
    fn parse_rejects_junk() {
        assert_eq!(PageId::parse(""), None);
        assert_eq!(PageId::parse("23"), None);
        assert_eq!(PageId::parse("20x8"), None);
        assert_eq!(PageId::parse("Reflections"), None);
    }

    #[test]
    fn display_round_trips() {
        for page in PAGE_ORDER {
            assert_eq!(PageId::parse(&page.to_string()), Some(page));
        }
    }

    #[test]
    fn every_year_has_a_clip() {
        for year in YEARS {
            let source = narration_source(year).unwrap();
            assert_eq!(source, format!("audio/{year}_vday.mp3"));
        }
        assert_eq!(narration_source(2017), None);
    }

    #[test]
    fn first_year_label_is_special() {
        assert_eq!(narration_label(2018, false), "The beginning of Bahbs");
        assert_eq!(narration_label(2018, true), "Pause the beginning of Bahbs");
    }

    #[test]
    fn other_years_use_the_template() {
        assert_eq!(narration_label(2019, false), "Listen to V-Day in 2019");
        assert_eq!(narration_label(2024, true), "Pause V-Day in 2024");
    }
}
