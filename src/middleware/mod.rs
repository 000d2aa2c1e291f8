pub mod bank_request;
pub mod flash;
