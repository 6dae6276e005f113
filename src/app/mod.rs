pub mod form;

pub use form::{FormOutcome, FormRunner, HealthOutcome, TripForm};
