/// Placeholder stored in text fields that could not be read from the page.
pub const SENTINEL: &str = "N/A";

/// One accepted entry of the top chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub rank: u32,
    pub title: String,
    /// Raw year text as read from the page, possibly the sentinel.
    pub year: String,
    pub rating: Option<f64>,
}

impl Movie {
    pub fn to_csvable_array(&self) -> Vec<String> {
        vec![
            self.rank.to_string(),
            self.title.clone(),
            self.year.clone(),
            self.rating.map(|r| r.to_string()).unwrap_or_default(),
        ]
    }

    pub fn csv_titles() -> Vec<&'static str> {
        vec!["Rank", "Title", "Year", "Rating"]
    }

    /// Year coerced to a number, `None` when the raw text is not numeric.
    pub fn numeric_year(&self) -> Option<i32> {
        self.year
            .trim()
            .parse::<f64>()
            .ok()
            .map(f64::floor)
            .filter(|y| *y >= i32::MIN as f64 && *y <= i32::MAX as f64)
            .map(|y| y as i32)
    }

    /// Year rounded down to its decade, e.g. 1994 -> 1990.
    pub fn decade(&self) -> Option<i32> {
        self.numeric_year()
            .and_then(|y| y.div_euclid(10).checked_mul(10))
    }
}
