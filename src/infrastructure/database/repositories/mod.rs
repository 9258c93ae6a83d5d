pub mod repository_provider;
pub mod request_repository;
pub mod slot_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
pub use request_repository::SeaOrmRequestRepository;
pub use slot_repository::SeaOrmSlotRepository;
