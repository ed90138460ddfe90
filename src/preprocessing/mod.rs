pub mod refiner;
pub mod keywords;

pub use refiner::{refine, Refiner};
pub use keywords::search_keywords;

#[cfg(test)]
mod tests;
