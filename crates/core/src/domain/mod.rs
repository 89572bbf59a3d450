pub mod history;
pub mod trip;
