pub mod advice_service;
pub mod ledger_service;
pub mod lucky_service;
pub mod report_service;
