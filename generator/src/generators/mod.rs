mod common;

#[cfg(feature = "generator-listing")]
mod listing;
#[cfg(feature = "generator-rust")]
mod rust;

#[cfg(not(any(feature = "generator-rust", feature = "generator-listing")))]
compile_error!("At least one generator must be enabled");

use clap::ValueEnum;
use xcm_xsd::ContentModel;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Generator {
    #[cfg(feature = "generator-rust")]
    Rust,
    #[cfg(feature = "generator-listing")]
    Listing,
}

impl Default for Generator {
    #[cfg(feature = "generator-rust")]
    fn default() -> Self {
        Self::Rust
    }

    #[cfg(not(feature = "generator-rust"))]
    fn default() -> Self {
        Self::Listing
    }
}

impl Generator {
    pub fn generate(&self, models: &[ContentModel]) -> String {
        match *self {
            #[cfg(feature = "generator-rust")]
            Self::Rust => rust::generate(models),
            #[cfg(feature = "generator-listing")]
            Self::Listing => listing::generate(models),
        }
    }
}
