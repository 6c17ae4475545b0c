use super::*;

mod concurrency;
mod library;
mod progression;
mod summaries;
