pub mod add;
pub mod chart;
pub mod gui;
pub mod menu;
pub mod report;
pub mod terminal;
