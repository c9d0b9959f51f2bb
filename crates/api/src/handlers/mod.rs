pub mod batch_qrcode;
pub mod qrcode;
