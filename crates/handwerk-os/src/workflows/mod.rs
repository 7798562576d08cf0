pub mod billing;
pub mod cockpit;
pub mod health;
