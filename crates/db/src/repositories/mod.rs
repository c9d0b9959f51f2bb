//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod batch_qr_code_repo;
pub mod qr_code_repo;

pub use batch_qr_code_repo::BatchQrCodeRepo;
pub use qr_code_repo::QrCodeRepo;
