// Domain layer - Pure track rendering and calendar matching logic
pub mod calendar;
pub mod chart;
pub mod color;
pub mod error;
pub mod overlay;
pub mod position;
pub mod selection;
pub mod track;
