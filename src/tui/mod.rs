pub mod grid;
pub mod input;
pub mod mode;
pub mod theme;
pub mod view;
