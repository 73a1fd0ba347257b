//! In-memory table model filled from workbook sheets.

pub mod column;
pub mod range;
pub mod table;
pub mod value;
