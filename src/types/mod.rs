pub mod birth_date;
pub mod guid;
pub mod text;

pub mod author;
