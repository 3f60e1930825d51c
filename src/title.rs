use std::sync::LazyLock;

use regex::Regex;

/// Characters that are turned into a single space before the year scan.
pub const SEPARATORS: [char; 9] = ['.', '_', '-', '(', ')', '[', ']', '{', '}'];

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("year pattern is a valid regex"));

/// Title and optional release year guessed from a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleGuess {
    pub title: String,
    pub year: Option<String>,
}

impl TitleGuess {
    pub fn new(title: impl Into<String>, year: Option<&str>) -> Self {
        Self {
            title: title.into(),
            year: year.map(str::to_string),
        }
    }
}

/// Replace every separator character with a space. Repeats are not collapsed.
pub fn separate(filename: &str) -> String {
    filename
        .chars()
        .map(|ch| if SEPARATORS.contains(&ch) { ' ' } else { ch })
        .collect()
}

/// Guess a movie title and year from a file name such as
/// `Bruiser.2022.LIGHTDLMOVIES.mkv`.
///
/// The first run of four digits is taken as the year and everything before
/// it becomes the title. Without a year the whole substituted name is the
/// title, extension included. Whitespace is left exactly as produced by
/// [`separate`].
pub fn normalize(filename: &str) -> TitleGuess {
    let cleaned = separate(filename);

    match YEAR_PATTERN.find(&cleaned) {
        // leftmost match, so this is also the first occurrence of the substring
        Some(year) => TitleGuess {
            title: cleaned[..year.start()].to_string(),
            year: Some(year.as_str().to_string()),
        },
        None => TitleGuess {
            title: cleaned,
            year: None,
        },
    }
}
