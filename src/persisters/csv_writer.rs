use std::path::Path;

use csv::Writer;

use crate::{error::PersistError, model::movie::Movie, model::movie_table::MovieTable};

pub struct CsvWriter {}

impl CsvWriter {
    /// Writes the table to `file_path`, replacing any existing file, and
    /// returns the number of data rows written.
    pub fn save_movies_to_csv(movies: &MovieTable, file_path: &Path) -> Result<usize, PersistError> {
        let mut wrt = Writer::from_path(file_path)?;
        wrt.write_record(Movie::csv_titles())?;

        for movie in movies.iter() {
            wrt.write_record(movie.to_csvable_array())?;
        }
        wrt.flush()?;

        log::info!("Saved {} movies to {}", movies.len(), file_path.display());
        Ok(movies.len())
    }
}
