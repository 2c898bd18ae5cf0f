pub mod auth;
pub mod cart;
pub mod dashboard_service;
pub mod document_service;
pub mod inventory_service;
pub mod ledger;
pub mod order_service;
pub mod stock_calculator;
