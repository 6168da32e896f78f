pub mod classifier;
pub mod draw_scorer;
pub mod select;

pub use classifier::classify;
pub use draw_scorer::score;
pub use select::select_best;
