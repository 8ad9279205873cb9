pub mod games;
pub mod locations;
pub mod platforms;
pub mod teams;
pub mod viewing_options;
