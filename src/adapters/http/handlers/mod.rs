pub mod invoices_api;
pub mod invoices_web;
