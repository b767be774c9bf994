pub mod add;
pub mod delete;
pub mod exec;
pub mod info;
pub mod list;
