pub mod cuisine;
pub mod dishes;
pub mod encoder;
pub mod insights;
pub mod preference_model;
pub mod ranking;
pub mod recommender;

pub use cuisine::{CuisineNormalizer, CuisineRule};
pub use dishes::DishSummarizer;
pub use encoder::CategoryEncoder;
pub use preference_model::{FitOptions, PreferenceModel};
pub use ranking::RankingEngine;
pub use recommender::Recommender;
