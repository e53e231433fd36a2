pub mod benchmark_service;
pub mod portfolio_service;
pub mod returns_service;
