//! Terminal front-end for the exchange-rate service

pub mod convert;
pub mod rates;
pub mod setup;
pub mod status;
pub mod ui;
