pub mod fetcher;
pub mod poller;
