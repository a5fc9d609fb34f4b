pub mod daily_record;
pub mod dashboard;
pub mod dues;
pub mod milkman;
pub mod payment;
pub mod product;
pub mod profile;
pub mod rates;
