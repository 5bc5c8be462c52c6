pub mod currency;
pub mod table;

pub use currency::format_idr;
pub use table::Table;
