//! Optipress processing: format sniffing, upload validation, and the
//! transcode engine over the mozjpeg/webp/ravif/image codec stack.

pub mod probe;
pub mod sniffer;
pub mod transcode;
pub mod validator;

pub use probe::probe_dimensions;
pub use sniffer::classify;
pub use transcode::transcode;
pub use validator::UploadValidator;
