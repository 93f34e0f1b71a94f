pub mod daily_facts;
pub mod exchange_rates;
pub mod headcount;
pub mod member_report;
pub mod slicers;
pub mod users;
