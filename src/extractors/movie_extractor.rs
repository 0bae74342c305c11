use select::{document::Document, node::Node};

use crate::{
    config::{ElementSelector, PageSelectors},
    model::{
        movie::{Movie, SENTINEL},
        movie_table::MovieTable,
    },
};

/// Outcome of reading a single sub-field of a list entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Present(T),
    /// The field could not be read; carries the fallback value.
    Absent(T),
}

impl<T> Field<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    pub fn into_value(self) -> T {
        match self {
            Field::Present(value) | Field::Absent(value) => value,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Extraction {
    pub movies: MovieTable,
    /// Number of list entries located on the page.
    pub found: usize,
    /// Entries discarded because their rank was not a positive number.
    pub dropped: usize,
}

#[derive(Debug)]
pub struct MovieExtractor {}

impl MovieExtractor {
    pub fn extract_movies_from_html(html_body: &str, selectors: &PageSelectors) -> Extraction {
        let document = Document::from(html_body);
        let mut extraction = Extraction::default();

        for (idx, entry) in document.find(selectors.entry.predicate()).enumerate() {
            extraction.found += 1;
            match MovieExtractor::extract_movie(&entry, idx + 1, selectors) {
                Some(movie) => extraction.movies.push(movie),
                None => extraction.dropped += 1,
            }
        }

        extraction
    }

    /// Builds a movie out of one list entry. `position` is the 1-based index of
    /// the entry and stands in for the rank when the title carries none.
    /// Returns `None` when the rank is not a positive number.
    pub fn extract_movie(entry: &Node, position: usize, selectors: &PageSelectors) -> Option<Movie> {
        let (rank, title) = match MovieExtractor::extract_text(entry, selectors.title) {
            Field::Present(title_block) => MovieExtractor::split_rank_and_title(&title_block, position),
            Field::Absent(_) => (position.to_string(), SENTINEL.to_string()),
        };
        let year = MovieExtractor::extract_text(entry, selectors.year).into_value();
        let rating = MovieExtractor::extract_text(entry, selectors.rating).into_value();

        let rank = match MovieExtractor::parse_rank(&rank) {
            Some(rank) => rank,
            None => {
                log::debug!("Dropping entry {} with non-numeric rank {:?}", position, rank);
                return None;
            }
        };

        Some(Movie {
            rank,
            title,
            year,
            rating: MovieExtractor::parse_rating(&rating),
        })
    }

    /// Reads the trimmed text of the first element under `entry` matching
    /// `selector`, falling back to the sentinel when there is none or it is blank.
    pub fn extract_text(entry: &Node, selector: ElementSelector) -> Field<String> {
        MovieExtractor::extract_or_default(
            entry,
            selector,
            |text| Some(text.trim().to_string()).filter(|t| !t.is_empty()),
            SENTINEL.to_string(),
        )
    }

    pub fn extract_or_default<T>(
        entry: &Node,
        selector: ElementSelector,
        read: impl Fn(String) -> Option<T>,
        default: T,
    ) -> Field<T> {
        entry
            .find(selector.predicate())
            .next()
            .and_then(|n| read(n.text()))
            .map(Field::Present)
            .unwrap_or(Field::Absent(default))
    }

    /// Splits `"3. The Godfather Part II"` into `("3", "The Godfather Part II")`.
    /// Without a `.` the whole text is the title and `position` the rank.
    pub fn split_rank_and_title(title_block: &str, position: usize) -> (String, String) {
        let (rank, title) = match title_block.split_once('.') {
            Some((rank, title)) => (rank.trim().to_string(), title.trim().to_string()),
            None => (position.to_string(), title_block.trim().to_string()),
        };

        if title.is_empty() {
            return (rank, SENTINEL.to_string());
        }
        (rank, title)
    }

    pub fn parse_rank(rank: &str) -> Option<u32> {
        if rank.is_empty() || !rank.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        rank.parse::<u32>().ok().filter(|r| *r > 0)
    }

    pub fn parse_rating(rating: &str) -> Option<f64> {
        rating
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_html(title: Option<&str>, year: Option<&str>, rating: Option<&str>) -> String {
        let mut html = String::from(r#"<li class="ipc-metadata-list-summary-item">"#);
        if let Some(title) = title {
            html += &format!(r#"<div><a><h3 class="ipc-title__text">{}</h3></a></div>"#, title);
        }
        html += r#"<div class="cli-title-metadata">"#;
        if let Some(year) = year {
            html += &format!(r#"<span class="cli-title-metadata-item">{}</span>"#, year);
        }
        html += r#"<span class="cli-title-metadata-item">2h 22m</span></div>"#;
        if let Some(rating) = rating {
            html += &format!(
                r#"<span class="ipc-rating-star"><span class="ipc-rating-star--rating">{}</span><span class="ipc-rating-star--voteCount">(2.9M)</span></span>"#,
                rating
            );
        }
        html += "</li>";
        html
    }

    fn page(entries: &[String]) -> String {
        format!(
            r#"<html><body><ul class="ipc-metadata-list">{}</ul></body></html>"#,
            entries.concat()
        )
    }

    fn extract(entries: &[String]) -> Extraction {
        MovieExtractor::extract_movies_from_html(&page(entries), &PageSelectors::default())
    }

    #[test]
    fn extracts_all_fields_of_an_entry() {
        let extraction = extract(&[entry_html(
            Some("1. The Shawshank Redemption"),
            Some("1994"),
            Some("9.3"),
        )]);

        assert_eq!(extraction.found, 1);
        assert_eq!(extraction.dropped, 0);
        assert_eq!(
            extraction.movies.movies(),
            &[Movie {
                rank: 1,
                title: "The Shawshank Redemption".to_string(),
                year: "1994".to_string(),
                rating: Some(9.3),
            }]
        );
    }

    #[test]
    fn splits_rank_from_title_on_first_dot() {
        assert_eq!(
            MovieExtractor::split_rank_and_title("3. The Godfather Part II", 7),
            ("3".to_string(), "The Godfather Part II".to_string())
        );
        assert_eq!(
            MovieExtractor::split_rank_and_title("12. Dr. Strangelove", 1),
            ("12".to_string(), "Dr. Strangelove".to_string())
        );
    }

    #[test]
    fn falls_back_to_position_when_title_has_no_rank() {
        assert_eq!(
            MovieExtractor::split_rank_and_title("Inception", 5),
            ("5".to_string(), "Inception".to_string())
        );

        let entries: Vec<String> = (1..=5)
            .map(|i| entry_html(Some(if i == 5 { "Inception" } else { "1. Other" }), Some("2010"), Some("8.8")))
            .collect();
        let extraction = extract(&entries);
        let inception = &extraction.movies.movies()[4];
        assert_eq!(inception.rank, 5);
        assert_eq!(inception.title, "Inception");
    }

    #[test]
    fn missing_title_uses_position_and_sentinel() {
        let extraction = extract(&[
            entry_html(Some("1. Movie A"), Some("1995"), Some("9.0")),
            entry_html(None, Some("2001"), Some("7.5")),
        ]);

        let movie = &extraction.movies.movies()[1];
        assert_eq!(movie.rank, 2);
        assert_eq!(movie.title, SENTINEL);
        assert_eq!(movie.year, "2001");
    }

    #[test]
    fn coerces_rating_to_number_or_none() {
        assert_eq!(MovieExtractor::parse_rating("8.7"), Some(8.7));
        assert_eq!(MovieExtractor::parse_rating(" 9 "), Some(9.0));
        assert_eq!(MovieExtractor::parse_rating("N/A"), None);
        assert_eq!(MovieExtractor::parse_rating("8,7"), None);
        assert_eq!(MovieExtractor::parse_rating("NaN"), None);
        assert_eq!(MovieExtractor::parse_rating("inf"), None);
    }

    #[test]
    fn missing_year_and_rating_degrade_only_those_fields() {
        let extraction = extract(&[entry_html(Some("4. The Dark Knight"), None, None)]);

        let movie = &extraction.movies.movies()[0];
        assert_eq!(movie.rank, 4);
        assert_eq!(movie.title, "The Dark Knight");
        // the runtime span is now the first metadata item
        assert_eq!(movie.year, "2h 22m");
        assert_eq!(movie.rating, None);
    }

    #[test]
    fn drops_entries_with_non_numeric_rank() {
        let extraction = extract(&[
            entry_html(Some("x. Movie B"), Some("2001"), Some("7.5")),
            entry_html(Some(" . Movie D"), Some("2001"), Some("7.5")),
            entry_html(Some("0. Movie E"), Some("2001"), Some("7.5")),
            entry_html(Some("2. Movie F"), Some("2001"), Some("7.5")),
        ]);

        assert_eq!(extraction.found, 4);
        assert_eq!(extraction.dropped, 3);
        assert_eq!(extraction.movies.len(), 1);
        assert_eq!(extraction.movies.movies()[0].rank, 2);
    }

    #[test]
    fn every_accepted_rank_is_positive() {
        let extraction = extract(&[
            entry_html(Some("-1. Negative"), Some("2001"), Some("7.5")),
            entry_html(Some("+2. Signed"), Some("2001"), Some("7.5")),
            entry_html(Some("99999999999. Overflow"), Some("2001"), Some("7.5")),
            entry_html(Some("3. Fine"), Some("2001"), Some("7.5")),
        ]);

        assert!(extraction.movies.iter().all(|m| m.rank > 0));
        assert_eq!(extraction.movies.len(), 1);
    }

    #[test]
    fn keeps_duplicate_ranks() {
        let extraction = extract(&[
            entry_html(Some("1. Movie A"), Some("1995"), Some("9.0")),
            entry_html(Some("1. Movie A again"), Some("1995"), Some("9.0")),
        ]);

        let ranks: Vec<u32> = extraction.movies.iter().map(|m| m.rank).collect();
        assert_eq!(ranks, vec![1, 1]);
    }

    #[test]
    fn page_without_entries_yields_nothing() {
        let extraction =
            MovieExtractor::extract_movies_from_html("<html><body></body></html>", &PageSelectors::default());

        assert_eq!(extraction, Extraction::default());
    }

    #[test]
    fn extract_or_default_reports_absence() {
        let document = Document::from(page(&[entry_html(Some("1. Movie A"), None, None)]).as_str());
        let selectors = PageSelectors::default();
        let entry = document.find(selectors.entry.predicate()).next().unwrap();

        let rating = MovieExtractor::extract_or_default(
            &entry,
            selectors.rating,
            |text| MovieExtractor::parse_rating(&text),
            -1.0,
        );
        assert_eq!(rating, Field::Absent(-1.0));
        assert!(MovieExtractor::extract_text(&entry, selectors.title).is_present());
    }
}
