pub mod breadth;
pub mod serve;
pub mod series;
