pub mod favourite;
pub mod media;

pub use favourite::{FavouriteDocument, FavouriteItem};
pub use media::{
    Genre, MediaDetail, MediaSummary, MovieDetail, ProductionCompany, SeasonSummary,
    SeriesDetail,
};
