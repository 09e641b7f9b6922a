mod extractor;
mod fetcher;
mod pipeline;

pub use extractor::Extractor;
pub use fetcher::Fetcher;
pub use pipeline::ScrapePipeline;
