pub mod frame_screener;
pub mod live_screening_use_case;
pub mod pipeline_logger;
pub mod screen_image_use_case;
pub mod screening_report;
