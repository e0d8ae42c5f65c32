pub mod render_task;
pub mod storage_task;
pub mod usb_task;
