pub mod init;
pub mod list_players;
pub mod play;
pub mod rank;
pub mod results;
pub mod validate;
