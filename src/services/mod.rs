/// Whole-collection read and replace.
pub mod collection_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Background storage connection supervisor.
pub mod storage_supervisor;
