use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process;
use std::thread;

use clap::Parser;
use crossbeam_channel::Receiver;

use maskguard_core::classification::domain::mask_classifier::MaskClassifier;
use maskguard_core::detection::infrastructure::detecting_face_source::DetectingFaceSource;
use maskguard_core::detection::infrastructure::onnx_blazeface_detector::OnnxBlazefaceDetector;
use maskguard_core::pipeline::frame_screener::{FrameScreener, ScreeningThresholds};
use maskguard_core::pipeline::live_screening_use_case::LiveScreeningUseCase;
use maskguard_core::pipeline::pipeline_logger::LogPipelineLogger;
use maskguard_core::pipeline::screen_image_use_case::ScreenImageUseCase;
use maskguard_core::rendering::domain::frame_annotator::FrameAnnotator;
use maskguard_core::rendering::domain::frame_sink::{FrameSink, NullFrameSink};
use maskguard_core::rendering::infrastructure::preview_file_sink::PreviewFileSink;
use maskguard_core::shared::constants::{
    DEFAULT_FACE_PROBABILITY, FACE_MODEL_NAME, IMAGE_EXTENSIONS, MASK_MODEL_NAME, STOP_KEY,
};
use maskguard_core::shared::model_resolver;
use maskguard_core::video::domain::video_stream::VideoStream;
use maskguard_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use maskguard_core::video::infrastructure::image_file_reader::ImageFileReader;
use maskguard_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// Face mask screening for images, videos and live streams.
#[derive(Parser)]
#[command(name = "maskguard")]
struct Cli {
    /// Input image, video file or stream URL.
    input: PathBuf,

    /// Annotated image output. In live mode, the preview image that is
    /// overwritten with every frame.
    output: Option<PathBuf>,

    /// Mask classifier model (ONNX).
    #[arg(long, default_value = MASK_MODEL_NAME)]
    mask_model: PathBuf,

    /// Face detection model (BlazeFace ONNX).
    #[arg(long, default_value = FACE_MODEL_NAME)]
    face_model: PathBuf,

    /// Download the face model from here if it is not found locally.
    #[arg(long)]
    face_model_url: Option<String>,

    /// Minimum "wearing mask" probability (0.0-1.0). Defaults to 0.995 for
    /// images and 0.975 in live mode.
    #[arg(long)]
    mask_probability: Option<f64>,

    /// Minimum face detection confidence (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_FACE_PROBABILITY)]
    face_probability: f64,

    /// Treat the input as a video stream even if it looks like an image.
    #[arg(long)]
    live: bool,

    /// Log the mask probability of every face.
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    validate(&cli)?;

    let live = cli.live || !is_image(&cli.input);
    let mut thresholds = if live {
        ScreeningThresholds::live()
    } else {
        ScreeningThresholds::default()
    };
    if let Some(p) = cli.mask_probability {
        thresholds.mask_probability = p;
    }
    thresholds.face_probability = cli.face_probability;

    let screener = build_screener(&cli)?;

    if live {
        run_live(&cli.input, cli.output.as_deref(), screener, &thresholds)
    } else {
        run_image(&cli.input, cli.output.as_deref(), screener, &thresholds)
    }
}

fn run_image(
    input: &Path,
    output: Option<&Path>,
    screener: FrameScreener,
    thresholds: &ScreeningThresholds,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut use_case = ScreenImageUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new()),
        screener,
    );
    let report = use_case.execute(input, output, thresholds)?;

    for (i, label) in report.labels().iter().enumerate() {
        println!("Face {}: {label}", i + 1);
    }
    if report.any_masked {
        println!("Mask detected");
    } else {
        println!("No mask detected");
    }
    Ok(())
}

fn run_live(
    input: &Path,
    preview: Option<&Path>,
    screener: FrameScreener,
    thresholds: &ScreeningThresholds,
) -> Result<(), Box<dyn std::error::Error>> {
    let sink: Box<dyn FrameSink> = match preview {
        Some(path) => Box::new(PreviewFileSink::new(
            Box::new(ImageFileWriter::new()),
            path.to_path_buf(),
        )),
        None => Box::new(NullFrameSink),
    };

    let stream = VideoStream::start(Box::new(FfmpegReader::new()), input)?;
    eprintln!("Screening {} (type '{STOP_KEY}' and Enter to stop)", input.display());

    let mut use_case =
        LiveScreeningUseCase::new(screener, sink, Box::new(LogPipelineLogger::default()))
            .with_stop_signal(watch_stdin_for_stop());
    let summary = use_case.execute(stream, thresholds)?;

    println!(
        "Screened {} frames: {} with a masked face, {} skipped",
        summary.frames, summary.masked_frames, summary.skipped_frames
    );
    Ok(())
}

fn build_screener(cli: &Cli) -> Result<FrameScreener, Box<dyn std::error::Error>> {
    let mask_model = model_resolver::resolve(&cli.mask_model, None, None)?;
    let classifier = MaskClassifier::load(&mask_model)?.with_verbose(cli.verbose);

    log::info!("Resolving model: {}", cli.face_model.display());
    let face_model = model_resolver::resolve(
        &cli.face_model,
        cli.face_model_url.as_deref(),
        Some(Box::new(download_progress)),
    )?;
    let detector = OnnxBlazefaceDetector::new(&face_model)?;
    let face_source = DetectingFaceSource::new(Box::new(detector), classifier.input_spec());

    Ok(FrameScreener::new(
        Box::new(face_source),
        classifier,
        FrameAnnotator::default(),
    ))
}

/// Sends a stop request when `STOP_KEY` is typed on its own line.
fn watch_stdin_for_stop() -> Receiver<()> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().eq_ignore_ascii_case(STOP_KEY) {
                let _ = tx.send(());
                break;
            }
        }
    });
    rx
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !is_stream_url(&cli.input) && !cli.input.exists() {
        return Err(format!("Input not found: {}", cli.input.display()).into());
    }
    if let Some(p) = cli.mask_probability {
        if !(0.0..=1.0).contains(&p) {
            return Err(format!("Mask probability must be between 0.0 and 1.0, got {p}").into());
        }
    }
    if !(0.0..=1.0).contains(&cli.face_probability) {
        return Err(format!(
            "Face probability must be between 0.0 and 1.0, got {}",
            cli.face_probability
        )
        .into());
    }
    if let Some(output) = &cli.output {
        if !is_image(output) {
            return Err(format!(
                "Output must be an image file ({}), got {}",
                IMAGE_EXTENSIONS.join(", "),
                output.display()
            )
            .into());
        }
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_stream_url(path: &Path) -> bool {
    path.to_str().is_some_and(|s| s.contains("://"))
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}
