pub mod booking;
pub mod month;
pub mod series;

pub use booking::*;
pub use month::*;
pub use series::*;
