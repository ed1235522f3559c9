pub mod evaluate;
pub mod fit;
pub mod sweep;
