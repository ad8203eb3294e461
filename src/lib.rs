#![forbid(unsafe_code)]

pub mod cli;
pub mod date;
pub mod extract;
pub mod fetch;
pub mod formats;
pub mod jsonld;
pub mod logging;
pub mod normalize;
pub mod scrape;
pub mod store;
