pub mod customer_repository;
pub mod invoice_repository;

pub use customer_repository::PostgresCustomerRepository;
pub use invoice_repository::PostgresInvoiceRepository;
