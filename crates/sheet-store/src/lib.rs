pub mod rows;
pub mod worksheet;

pub use rows::{decision_cells, render_csv, HEADER};
pub use worksheet::CsvWorksheet;
