pub mod configuration;
mod location;
pub mod repository;
mod rights;
mod schedule;
pub mod snapshot;

#[cfg(test)]
mod scenarios;
