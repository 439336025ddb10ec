pub mod convert;
pub mod form;
pub mod interactive;
pub mod rates;
pub mod session;
pub mod setup;
pub mod ui;
