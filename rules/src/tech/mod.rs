mod tech_column;
mod technology;

pub use tech_column::TechColumn;
pub use technology::Technology;
