pub mod extractor;
pub mod fetcher;
pub mod reconciler;
pub mod scheduler;
pub mod scraper;
