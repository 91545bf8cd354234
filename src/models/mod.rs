pub mod catalog;
pub mod movie;

pub use catalog::{CatalogData, CatalogMovie, CatalogResponse};
pub use movie::{
    placeholder, AwardsInfo, BasicInfo, CastCrewInfo, ErrorRecord, MovieRecord, PlotInfo,
    RatingInfo, RecordMeta,
};
