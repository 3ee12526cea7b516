use crate::entities::{movie, user};

pub type User = user::Model;
pub type Movie = movie::Model;

/// Earliest year accepted as a release year.
pub const MIN_RELEASE_YEAR: i32 = 1870;

/// How far past the current year an announced release may be dated.
const MAX_YEARS_AHEAD: i32 = 10;

#[derive(Clone, Debug, Default)]
pub struct NewMovie {
    pub user_id: i32,
    pub name: String,
    pub director: Option<String>,
    pub year: Option<i32>,
    pub poster_url: Option<String>,
}

/// Partial update for a movie. `None` leaves the stored value alone.
#[derive(Clone, Debug, Default)]
pub struct MoviePatch {
    pub name: Option<String>,
    pub director: Option<String>,
    pub year: Option<i32>,
}

impl MoviePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.director.is_none() && self.year.is_none()
    }
}

/// A positive OMDb match, normalized. `year` is kept as the raw feed value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OmdbMovie {
    pub title: String,
    pub director: Option<String>,
    pub year: Option<String>,
    pub poster: Option<String>,
}

/// Parses a release year from the metadata feed.
///
/// Only four ASCII digits inside the plausible range are accepted; anything
/// else (`"N/A"`, `"2010–2012"`, `"99"`) yields `None`.
pub fn parse_release_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.len() != 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok().filter(|year| is_plausible_year(*year))
}

pub fn is_plausible_year(year: i32) -> bool {
    let current: i32 = jiff::Zoned::now().year().into();
    (MIN_RELEASE_YEAR..=current + MAX_YEARS_AHEAD).contains(&year)
}

/// Key used for every name/title uniqueness comparison.
pub fn dedup_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Trims `s` and drops it when nothing is left.
pub(crate) fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_four_digit_years() {
        assert_eq!(parse_release_year("2010"), Some(2010));
        assert_eq!(parse_release_year(" 1994 "), Some(1994));
    }

    #[test]
    fn rejects_unusable_years() {
        let unusable = [
            "N/A",
            "",
            "2010–2012",
            "2010-",
            "99",
            "0999",
            "-2010",
            "+201",
            "20100",
            "1500",
        ];
        for raw in unusable {
            assert_eq!(parse_release_year(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn far_future_years_are_implausible() {
        let current: i32 = jiff::Zoned::now().year().into();
        assert!(is_plausible_year(current + 1));
        assert!(!is_plausible_year(current + MAX_YEARS_AHEAD + 1));
        assert!(!is_plausible_year(0));
    }

    #[test]
    fn dedup_key_ignores_case_and_padding() {
        assert_eq!(dedup_key("  Alice "), dedup_key("aLICE"));
        assert_ne!(dedup_key("Alice"), dedup_key("Alicia"));
    }

    #[test]
    fn non_blank_trims_and_filters() {
        assert_eq!(non_blank(Some("  Nolan ")), Some("Nolan".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
