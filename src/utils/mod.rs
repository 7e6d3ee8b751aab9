pub mod paths;
pub mod terminal;
