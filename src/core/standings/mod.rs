pub mod date_range;
pub mod normalizer;
pub mod sheet_source;
pub mod standings_models;
pub mod standings_service;

pub use date_range::select_last_n_days;
pub use normalizer::normalize;
pub use sheet_source::{SheetError, SheetSource};
pub use standings_models::{RawGrid, Standing, Standings, StandingsError};
pub use standings_service::compute_standings;
