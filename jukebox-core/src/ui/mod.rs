pub mod card;
pub mod lists;
pub mod shell;
pub mod text;
