pub mod compose;
pub mod frame;
pub mod text;
pub mod theme;
