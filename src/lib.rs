pub mod cost;
pub mod fingers;
pub mod layout;
pub mod model;
pub mod planner;
pub mod sim;
pub mod trace;
pub mod transition;
