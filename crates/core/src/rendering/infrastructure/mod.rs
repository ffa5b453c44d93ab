pub mod preview_file_sink;
