// Application layer - Use cases orchestrating the domain
pub mod calendar_service;
pub mod location_repository;
pub mod map_controller;
pub mod track_renderer;
pub mod viewer_service;
