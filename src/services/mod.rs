pub mod cards;
pub mod charts;
pub mod export;
pub mod kpi;
