pub mod dataset;
pub mod glossary;
pub mod table;
