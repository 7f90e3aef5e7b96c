// Identity module - caller addresses as supplied by the host runtime

mod address;

pub use address::{Address, AddressError, ADDRESS_LEN};
