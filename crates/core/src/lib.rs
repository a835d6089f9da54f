pub mod table;
pub mod value;

pub use table::{Column, Table};
pub use value::{parse_date, Value};
