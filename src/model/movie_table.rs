use std::collections::BTreeMap;

use crate::model::movie::Movie;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieTable {
    movies: Vec<Movie>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatingHistogram {
    pub bins: Vec<HistogramBin>,
}

impl RatingHistogram {
    pub fn bin_width(&self) -> f64 {
        self.bins.first().map(|b| b.end - b.start).unwrap_or(0.0)
    }

    pub fn range(&self) -> Option<(f64, f64)> {
        match (self.bins.first(), self.bins.last()) {
            (Some(first), Some(last)) => Some((first.start, last.end)),
            _ => None,
        }
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

impl MovieTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, movie: Movie) {
        self.movies.push(movie);
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.movies.iter()
    }

    pub fn ratings(&self) -> Vec<f64> {
        self.movies.iter().filter_map(|m| m.rating).collect()
    }

    /// Best rated first, unrated movies skipped, ties in table order.
    pub fn top_n(&self, n: usize) -> Vec<&Movie> {
        let mut rated: Vec<&Movie> = self.movies.iter().filter(|m| m.rating.is_some()).collect();
        rated.sort_by(|a, b| {
            let (a, b) = (a.rating.unwrap_or(f64::MIN), b.rating.unwrap_or(f64::MIN));
            b.total_cmp(&a)
        });
        rated.truncate(n);
        rated
    }

    pub fn decade_averages(&self) -> Vec<(i32, f64)> {
        let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
        for movie in &self.movies {
            if let (Some(decade), Some(rating)) = (movie.decade(), movie.rating) {
                let entry = sums.entry(decade).or_insert((0.0, 0));
                entry.0 += rating;
                entry.1 += 1;
            }
        }

        sums.into_iter()
            .map(|(decade, (sum, count))| (decade, sum / count as f64))
            .collect()
    }

    pub fn rating_histogram(&self, bin_count: usize) -> RatingHistogram {
        let ratings = self.ratings();
        if ratings.is_empty() || bin_count == 0 {
            return RatingHistogram { bins: vec![] };
        }

        let (low, high) = rating_bounds(&ratings);
        let width = (high - low) / bin_count as f64;
        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                start: low + width * i as f64,
                end: if i + 1 == bin_count {
                    high
                } else {
                    low + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for rating in ratings {
            let idx = (((rating - low) / width).floor() as usize).min(bin_count - 1);
            bins[idx].count += 1;
        }

        RatingHistogram { bins }
    }

    /// Gaussian KDE scaled to histogram counts for bins of `bin_width`.
    pub fn rating_density(&self, from: f64, to: f64, bin_width: f64, samples: usize) -> Vec<(f64, f64)> {
        let ratings = self.ratings();
        let n = ratings.len();
        if n < 2 || samples < 2 {
            return vec![];
        }

        let mean = ratings.iter().sum::<f64>() / n as f64;
        let variance = ratings.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let std_dev = variance.sqrt();
        if std_dev == 0.0 {
            return vec![];
        }

        // Scott's rule
        let bandwidth = std_dev * (n as f64).powf(-0.2);
        let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
        let step = (to - from) / (samples - 1) as f64;

        (0..samples)
            .map(|i| {
                let x = from + step * i as f64;
                let density = norm
                    * ratings
                        .iter()
                        .map(|r| (-0.5 * ((x - r) / bandwidth).powi(2)).exp())
                        .sum::<f64>();
                (x, density * n as f64 * bin_width)
            })
            .collect()
    }
}

impl FromIterator<Movie> for MovieTable {
    fn from_iter<I: IntoIterator<Item = Movie>>(iter: I) -> Self {
        MovieTable {
            movies: iter.into_iter().collect(),
        }
    }
}

fn rating_bounds(ratings: &[f64]) -> (f64, f64) {
    let low = ratings.iter().copied().fold(f64::INFINITY, f64::min);
    let high = ratings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if low == high {
        (low - 0.5, high + 0.5)
    } else {
        (low, high)
    }
}
