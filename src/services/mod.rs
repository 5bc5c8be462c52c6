pub mod sar_service;
pub mod stream_service;
