//! SurrealDB repository implementations.

mod billing_record;
mod customer;
mod network_device;
mod region;

pub use billing_record::SurrealBillingRecordRepository;
pub use customer::SurrealCustomerRepository;
pub use network_device::SurrealNetworkDeviceRepository;
pub use region::SurrealRegionRepository;
