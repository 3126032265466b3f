pub mod columns;
mod table;

pub use table::AttributeTable;
