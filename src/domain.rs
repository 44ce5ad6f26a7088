pub mod grid1d;
pub mod state;
