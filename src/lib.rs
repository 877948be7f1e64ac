pub mod combat;
pub mod core;
pub mod encounter;
pub mod input;
pub mod mode;
pub mod player;
pub mod ui;
