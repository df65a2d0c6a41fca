pub mod assembler;
pub mod generator;
pub mod resolver;
pub mod spotify;

pub use assembler::PlaylistAssembler;
pub use generator::{CandidateSource, OpenAiGenerator};
pub use resolver::CatalogResolver;
pub use spotify::{Catalog, CatalogSession, SpotifyClient};
