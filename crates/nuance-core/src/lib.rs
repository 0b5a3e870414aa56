pub mod assistant;
pub mod bookmarks;
pub mod cards;
pub mod defaults;
pub mod explore;
pub mod storage;

#[cfg(test)]
mod fakes;
