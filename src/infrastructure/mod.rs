// Infrastructure layer - External dependencies and adapters
pub mod calendar_grid;
pub mod config;
pub mod http_response;
pub mod location_api;
pub mod payload;
pub mod view_mapper;
pub mod view_state;
