pub mod batch_service;
pub mod catalog_service;
pub mod history_service;
pub mod inventory_service;

pub use batch_service::BatchService;
pub use catalog_service::CatalogService;
pub use history_service::HistoryService;
pub use inventory_service::InventoryService;
