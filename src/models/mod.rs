// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{AvailabilityWindow, DomainError, Dog, DogWalker, Match, WindowOwner};
pub use requests::RunMatchesRequest;
pub use responses::{ErrorResponse, HealthResponse, ListMatchesResponse, RunMatchesResponse};
