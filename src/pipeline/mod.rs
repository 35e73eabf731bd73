//! Capture processing pipeline components.

mod coordinator;
mod processor;
mod worker;

pub use coordinator::{collect_input_files, is_image_file};
pub use processor::{CaptureContext, CaptureOutcome, decode_image, process_capture};
pub use worker::{CaptureTicket, CaptureWorker};
