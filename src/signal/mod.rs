pub mod lag;
pub mod matrix;
