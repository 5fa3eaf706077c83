pub mod doctor;
pub mod gateway;
pub mod send;
