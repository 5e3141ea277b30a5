pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Customer, Invoice, InvoiceFields, InvoiceSummary, NewInvoice};
pub use errors::{CacheError, InvoiceError};
pub use ports::{CustomerRepository, InvoiceRepository, PageCache, PageLookup};
pub use services::{InvoiceService, InvoiceServiceDependencies};
pub use value_objects::{AmountInCents, InvoiceStatus, ValueObjectError};
