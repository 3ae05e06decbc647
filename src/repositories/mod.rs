pub mod demand_repository;
pub mod report_repository;

// Re-export all repositories for convenient access
pub use demand_repository::DemandRepository;
pub use report_repository::ReportRepository;
