pub mod decision;
pub mod leave;
pub mod team;
