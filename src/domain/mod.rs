// Domain layer - Dashboard model, time/variable resolution and series alignment
pub mod dashboard;
pub mod error;
pub mod legend;
pub mod schema;
pub mod series;
pub mod templating;
pub mod time_spec;
