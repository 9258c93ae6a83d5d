pub mod database;
pub mod directory;

pub use database::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
pub use directory::{OpenJobRegistry, StaticTechnicianDirectory};
