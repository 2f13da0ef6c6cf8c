/// Stored entities and their queries
///
/// Two tables: accounts in [`user`], to-do items in [`task`]. Each type owns
/// its SQL; nothing outside this module writes queries against these tables.

pub mod task;
pub mod user;
